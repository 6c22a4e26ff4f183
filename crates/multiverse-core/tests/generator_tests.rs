use multiverse_backend::mock::MockBackend;
use multiverse_backend::{LoadParams, SamplingParams, TextGenBackend};
use multiverse_common::MultiverseError;
use multiverse_core::{registry, CharacterGenerator, GenerateOptions};
use std::sync::Arc;

fn generator() -> CharacterGenerator {
    CharacterGenerator::new(Arc::new(MockBackend::default()))
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn generate_returns_nonempty_text_without_path() {
    let result = generator()
        .generate(
            "fantasia",
            &strings(&["Elf", "Mage", "Chaotic Good", "Rivendell"]),
            &GenerateOptions::default(),
        )
        .unwrap();
    assert!(!result.text.trim().is_empty());
    assert!(result.path.is_none());
}

#[test]
fn quick_generate_matches_generate_with_examples() {
    let generator = generator();
    for u in registry::all() {
        let quick = generator
            .quick_generate(u.name, &GenerateOptions::default())
            .unwrap();
        let explicit = generator
            .generate(
                u.name,
                &strings(u.examples),
                &GenerateOptions::default(),
            )
            .unwrap();
        assert_eq!(quick.text, explicit.text, "universe '{}'", u.name);
    }
}

#[test]
fn invalid_params_fail_before_generation() {
    let opts = GenerateOptions {
        params: SamplingParams {
            temperature: 1.5,
            ..SamplingParams::default()
        },
        ..GenerateOptions::default()
    };
    let err = generator().quick_generate("fantasia", &opts).unwrap_err();
    assert!(matches!(err, MultiverseError::ParamOutOfRange { .. }));
}

#[test]
fn detail_validation_comes_before_params() {
    // with both wrong, the detail mismatch wins
    let opts = GenerateOptions {
        params: SamplingParams {
            temperature: 5.0,
            ..SamplingParams::default()
        },
        ..GenerateOptions::default()
    };
    let err = generator()
        .generate("fantasia", &strings(&["Elf", "Mage"]), &opts)
        .unwrap_err();
    match err {
        MultiverseError::DetailCountMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, 4);
            assert_eq!(actual, 2);
        }
        other => panic!("expected DetailCountMismatch, got {other:?}"),
    }
}

#[test]
fn unknown_universe_fails_before_params() {
    // universe resolution comes first, even with bad params
    let opts = GenerateOptions {
        params: SamplingParams {
            temperature: 99.0,
            ..SamplingParams::default()
        },
        ..GenerateOptions::default()
    };
    let err = generator().quick_generate("narnia", &opts).unwrap_err();
    assert!(matches!(err, MultiverseError::UnknownUniverse { .. }));
}

#[test]
fn save_writes_file_and_returns_path() {
    let dir = tempfile::tempdir().unwrap();
    let opts = GenerateOptions {
        save_to_file: true,
        output_dir: Some(dir.path().to_path_buf()),
        ..GenerateOptions::default()
    };
    let result = generator().quick_generate("fantasia", &opts).unwrap();
    let path = result.path.expect("path set when save requested");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains(&result.text));
}

#[test]
fn pipeline_failure_is_wrapped() {
    struct FailingBackend;
    impl TextGenBackend for FailingBackend {
        fn model_name(&self) -> &str {
            "failing"
        }
        fn generate(&self, _prompt: &str, _params: &SamplingParams) -> anyhow::Result<String> {
            anyhow::bail!("device lost")
        }
    }

    let generator = CharacterGenerator::new(Arc::new(FailingBackend));
    let err = generator
        .quick_generate("sci-fi", &GenerateOptions::default())
        .unwrap_err();
    match err {
        MultiverseError::Generation { source } => {
            assert!(source.to_string().contains("device lost"));
        }
        other => panic!("expected Generation, got {other:?}"),
    }
    assert_eq!(
        generator
            .quick_generate("sci-fi", &GenerateOptions::default())
            .unwrap_err()
            .code(),
        "GENERATION_ERROR"
    );
}

#[tokio::test]
async fn async_variant_matches_blocking() {
    let generator = generator();
    let details = strings(&["Ciborgue", "Piloto de Nave", "Aliança Galáctica", "Proxima Centauri"]);
    let blocking = generator
        .generate("sci-fi", &details, &GenerateOptions::default())
        .unwrap();
    let deferred = generator
        .generate_async("sci-fi", &details, &GenerateOptions::default())
        .await
        .unwrap();
    assert_eq!(blocking.text, deferred.text);
}

#[tokio::test]
async fn concurrent_requests_share_one_generator() {
    let generator = generator();
    let mut handles = Vec::new();
    for u in registry::all() {
        let g = generator.clone();
        let name = u.name;
        handles.push(tokio::spawn(async move {
            g.quick_generate_async(name, &GenerateOptions::default()).await
        }));
    }
    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert!(!result.text.is_empty());
    }
}

#[test]
fn load_failure_surfaces_as_model_init() {
    let err = MockBackend::load(LoadParams {
        model: "not-a-model".into(),
        ..LoadParams::default()
    })
    .map_err(|source| MultiverseError::ModelInit {
        model: "not-a-model".into(),
        source,
    })
    .unwrap_err();
    assert_eq!(err.code(), "MODEL_INIT_ERROR");
    assert!(err.to_string().contains("not-a-model"));
}
