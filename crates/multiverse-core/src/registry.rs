//! Static universe taxonomy.
//!
//! Universes ship with the crate; they are never mutated at runtime, so the
//! table and its name index are safe for unsynchronized concurrent reads.

use multiverse_common::{MultiverseError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One fictional setting: the fields a caller must supply, example values
/// for quick generation, and a positional prompt template.
#[derive(Debug)]
pub struct Universe {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub examples: &'static [&'static str],
    pub template: &'static str,
}

static UNIVERSES: &[Universe] = &[
    Universe {
        name: "fantasia",
        fields: &["Raça", "Classe", "Alinhamento", "Reino de Origem"],
        examples: &["Elfo", "Mago", "Neutro", "Floresta das Brumas"],
        template: "Crie um personagem de fantasia detalhado com:\n\
                   - Raça: {0}\n- Classe: {1}\n- Alinhamento: {2}\n- Origem: {3}\n\
                   Inclua habilidades mágicas, equipamento e um segredo obscuro.",
    },
    Universe {
        name: "sci-fi",
        fields: &["Espécie", "Profissão", "Afiliação", "Planeta Natal"],
        examples: &["Ciborgue", "Piloto de Nave", "Aliança Galáctica", "Proxima Centauri"],
        template: "Desenvolva um personagem de ficção científica com:\n\
                   - Espécie: {0}\n- Profissão: {1}\n- Afiliação: {2}\n- Planeta: {3}\n\
                   Descreva tecnologia avançada, conflitos interestelares e motivações.",
    },
    Universe {
        name: "terror",
        fields: &["Ocupação", "Fobia", "Relíquia Amaldiçoada", "Local Assombrado"],
        examples: &["Jornalista", "Medo de Aranhas", "Diário Antigo", "Asilo Abandonado"],
        template: "Elabore um personagem de horror cósmico com:\n\
                   - Ocupação: {0}\n- Fobia: {1}\n- Relíquia: {2}\n- Local: {3}\n\
                   Inclua sintomas de insanidade, conexões com entidades e aparência deteriorada.",
    },
    Universe {
        name: "cyberpunk",
        fields: &[
            "Implantes Cibernéticos",
            "Afiliação Corporativa/Gangue",
            "Especialização Criminal",
            "Distrito Urbano",
        ],
        examples: &[
            "Braço Biônico MK-5",
            "Night City Mercenaries",
            "Hacker de ICE",
            "Zona do Mercado Negro",
        ],
        template: "Construa um personagem cyberpunk noir com:\n\
                   - Implantes: {0}\n- Afiliação: {1}\n- Especialização: {2}\n- Distrito: {3}\n\
                   Descreva:\n\
                   1. Modificações cibernéticas visíveis\n\
                   2. Um traço de personalidade distópico\n\
                   3. Um vício ou dependência tecnológica\n\
                   4. Conflito com megacorporações\n\
                   Use gírias cyberpunk como 'choomba', 'corpo' e 'netrunner'.",
    },
    Universe {
        name: "anime",
        fields: &["Tipo de Personagem", "Habilidade Única", "Backstory", "Objetivo"],
        examples: &["Shonen Protagonista", "Rasengan", "Órfão de Guerra", "Tornar-se Hokage"],
        template: "Crie um personagem de anime detalhado com:\n\
                   1. Tipo: {0}\n2. Habilidade: {1}\n3. História: {2}\n4. Objetivo: {3}\n\n\
                   Inclua:\n\
                   - Um poder secreto ou transformação\n\
                   - Um lema característico\n\
                   - Design visual icônico (cabelo, roupas)\n\
                   - Uma fraqueza emocional\n\n\
                   Estilo: Use termos como 'nakama', 'power-up' e exclamações dramáticas!",
    },
    Universe {
        name: "marvel",
        fields: &["Origem do Poder", "Afiliação", "Arquétipo", "Localização"],
        examples: &["Radiação Cósmica", "Vingadores", "Anti-Herói", "Nova York"],
        template: "Desenvolva um personagem do universo Marvel com:\n\
                   1. Origem: {0}\n2. Afiliação: {1}\n3. Arquétipo: {2}\n4. Base: {3}\n\n\
                   Detalhe:\n\
                   - Uniforme/cosmético distintivo\n\
                   - Um conflito moral recorrente\n\
                   - Relacionamento icônico com outro herói/vilão\n\
                   - Frase de efeito característica\n\n\
                   Estilo: Misture ação grandiosa com dilemas humanos, no estilo MCU.",
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static Universe>> =
    Lazy::new(|| UNIVERSES.iter().map(|u| (u.name, u)).collect());

pub fn all() -> impl Iterator<Item = &'static Universe> {
    UNIVERSES.iter()
}

/// Universe ids in registry order.
pub fn names() -> Vec<&'static str> {
    UNIVERSES.iter().map(|u| u.name).collect()
}

pub fn lookup(name: &str) -> Option<&'static Universe> {
    BY_NAME.get(name).copied()
}

/// Like [`lookup`], but a miss carries the full id list for diagnostics.
pub fn get(name: &str) -> Result<&'static Universe> {
    lookup(name).ok_or_else(|| MultiverseError::UnknownUniverse {
        universe: name.to_string(),
        available: names().iter().map(|n| n.to_string()).collect(),
    })
}

/// Number of positional `{i}` placeholders a template expects, i.e. the
/// highest index present plus one.
pub fn placeholder_count(template: &str) -> usize {
    let mut max_index: Option<usize> = None;
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(close) = template[i + 1..].find('}') {
                if let Ok(idx) = template[i + 1..i + 1 + close].parse::<usize>() {
                    max_index = Some(max_index.map_or(idx, |m| m.max(idx)));
                    i += close + 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    max_index.map_or(0, |m| m + 1)
}
