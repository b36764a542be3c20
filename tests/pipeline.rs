//! the whole pipeline against the sample host in `demos/host`
use {
    std::path::{Path, PathBuf},
    tempfile::TempDir,
    themecap::{
        ExportPlan, TcError, ThemeCapture, export,
        capture::switch::ScopedThemeSwitch,
        color::ColorValue,
        export::json::parse_document,
        host::file::FileHost,
        models::{SourceCategory, ThemeName},
    },
};

const THEMES: [&str; 3] = ["light", "dark", "blue"];

/// copy the sample host into a temp dir so runs can't touch the original
fn sample_host() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("host");
    let sample = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/host");

    std::fs::create_dir_all(root.join("themes")).unwrap();
    std::fs::copy(sample.join("catalog.toml"), root.join("catalog.toml")).unwrap();
    std::fs::copy(sample.join("active.toml"), root.join("active.toml")).unwrap();

    for entry in std::fs::read_dir(sample.join("themes")).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), root.join("themes").join(entry.file_name())).unwrap();
    }

    (tmp, root)
}

#[tokio::test]
async fn test_capture_merge_and_export() {
    let (tmp, root) = sample_host();
    let before = std::fs::read(root.join("active.toml")).unwrap();

    let host = FileHost::open(&root).await.unwrap();
    let mut capture = ThemeCapture::new(host, THEMES);
    let dataset = capture.run().await.unwrap();

    assert_eq!(std::fs::read(root.join("active.toml")).unwrap(), before);

    let env = dataset.records(SourceCategory::EnvironmentColor);
    assert_eq!(env.len(), 4);
    assert_eq!(env[0].identity, "Environment.ToolWindowBackground");
    assert_eq!(
        env[0].colors.get("dark"),
        Some(ColorValue::from_packed_argb(0xFF25_2526))
    );

    for record in env.iter().chain(dataset.records(SourceCategory::RawColor)) {
        assert_eq!(record.colors.len(), THEMES.len());
    }

    let brushes = dataset.records(SourceCategory::Brush);
    let info_bar = brushes
        .iter()
        .find(|r| r.identity == "InfoBarBackgroundBrush")
        .unwrap();
    assert!(!info_bar.colors.contains("dark"));
    assert_eq!(
        brushes[0].colors.get("blue"),
        Some(ColorValue::new(255, 0x33, 0x99, 0xFF))
    );

    assert_eq!(dataset.records(SourceCategory::Classification).len(), 4);
    assert_eq!(dataset.gaps.len(), 2);

    let plan = ExportPlan {
        csv: true,
        ..ExportPlan::new(tmp.path().join("out"))
    };
    let report = export(&dataset, &plan).await.unwrap();

    assert!(report.workbook.as_ref().unwrap().exists());
    assert_eq!(report.csv.len(), 4);

    let document = parse_document(&std::fs::read(report.json.unwrap()).unwrap()).unwrap();
    assert_eq!(document.records.len(), dataset.record_count());
    assert_eq!(
        document.themes,
        THEMES.iter().map(|t| ThemeName::from(*t)).collect::<Vec<_>>()
    );

    for (parsed, merged) in document.records.iter().zip(dataset.all_records()) {
        assert_eq!(parsed.identity, merged.identity);
        assert_eq!(parsed.colors, merged.colors);
    }
}

#[tokio::test]
async fn test_unknown_theme_restores_active_settings() {
    let (_tmp, root) = sample_host();
    let before = std::fs::read(root.join("active.toml")).unwrap();

    let host = FileHost::open(&root).await.unwrap();
    let mut capture = ThemeCapture::new(host, ["light", "solarized", "dark"]);
    let err = capture.run().await.unwrap_err();

    assert!(matches!(err, TcError::ThemeApply { ref theme, .. } if theme.as_str() == "solarized"));
    assert_eq!(std::fs::read(root.join("active.toml")).unwrap(), before);
}

#[tokio::test]
async fn test_sample_host_lists_its_themes() {
    let (_tmp, root) = sample_host();
    let host = FileHost::open(&root).await.unwrap();

    let themes = host.themes().await.unwrap();
    assert_eq!(
        themes,
        ["blue", "dark", "light"].map(ThemeName::from).to_vec()
    );
}

#[tokio::test]
async fn test_failed_restore_leaves_the_settings_backup() {
    let (_tmp, root) = sample_host();
    let before = std::fs::read(root.join("active.toml")).unwrap();
    let host = FileHost::open(&root).await.unwrap();
    let active = root.join("active.toml");

    let err = ScopedThemeSwitch::new(&host)
        .run_under_themes(&[ThemeName::from("dark")], async |_: &ThemeName| {
            std::fs::remove_file(&active).unwrap();
            std::fs::create_dir(&active).unwrap();
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(err.host_left_dirty());

    let TcError::ThemeRestore { source, .. } = &err else {
        panic!("unexpected error: {err}");
    };

    let kept = source.kept_backup().unwrap();
    assert_eq!(std::fs::read(kept).unwrap(), before);

    std::fs::remove_file(kept).unwrap();
}
