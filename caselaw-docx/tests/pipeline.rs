//! Batch pipeline tests on real files

mod common;

use caselaw_docx::converter_config::{ConverterConfig, NumberingFallback, Profile};
use caselaw_docx::pipeline::{self, PipelineError};
use common::{paragraph, styled, DocxBuilder};
use std::fs;

fn decision() -> Vec<u8> {
    DocxBuilder::new()
        .body(&format!(
            "{}{}{}",
            paragraph(r#"<w:jc w:val="center"/>"#, "Gründe"),
            styled("RandNummer", ""),
            paragraph("", "Die Klage ist zulässig."),
        ))
        .build()
}

#[test]
fn test_directory_batch_writes_pages_next_to_inputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("2024")).unwrap();
    fs::write(dir.path().join("a.docx"), decision()).unwrap();
    fs::write(dir.path().join("2024").join("b.docx"), decision()).unwrap();

    let files = pipeline::discover_inputs(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 2);

    let jobs = pipeline::plan_jobs(&files, None);
    let results = pipeline::run_jobs(jobs, &ConverterConfig::default(), false);
    assert!(results.iter().all(|r| r.result.is_ok()));

    let page = fs::read_to_string(dir.path().join("2024").join("b.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>b</title>"));
    assert!(page.contains(
        "<border-number><number>1</number><content><p>Die Klage ist zulässig.</p></content></border-number>"
    ));
}

#[test]
fn test_output_directory_and_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("eins.docx");
    let second = dir.path().join("zwei.docx");
    fs::write(&first, decision()).unwrap();
    fs::write(&second, decision()).unwrap();
    let out = dir.path().join("html");

    let files = pipeline::discover_inputs(&[first, second]).unwrap();
    let jobs = pipeline::plan_jobs(&files, Some(out.as_path()));
    let results = pipeline::run_jobs(jobs, &ConverterConfig::default(), true);
    assert_eq!(results.len(), 2);

    let fragment = fs::read_to_string(out.join("zwei.html")).unwrap();
    assert!(fragment.starts_with("<p style=\"text-align: center;\">Gründe</p>"));
    assert!(!fragment.contains("<html"));
}

#[test]
fn test_broken_document_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gut.docx"), decision()).unwrap();
    fs::write(dir.path().join("kaputt.docx"), b"PK but not really").unwrap();

    let files = pipeline::discover_inputs(&[dir.path().to_path_buf()]).unwrap();
    let jobs = pipeline::plan_jobs(&files, None);
    let results = pipeline::run_jobs(jobs, &ConverterConfig::default(), false);

    let failed: Vec<_> = results.iter().filter(|r| r.result.is_err()).collect();
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].result,
        Err(PipelineError::LoadError(_, _))
    ));
    assert!(dir.path().join("gut.html").is_file());
    assert!(!dir.path().join("kaputt.html").exists());
}

#[test]
fn test_config_file_overrides_profile_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caselaw-docx.toml");
    fs::write(
        &path,
        r#"
profile = "alternative"
numbering_fallback = "always-wrap"
border_number_styles = ["Rn"]
"#,
    )
    .unwrap();

    let config = ConverterConfig::load(&path).unwrap();
    assert_eq!(config.profile, Profile::Alternative);
    assert_eq!(config.numbering_fallback(), NumberingFallback::AlwaysWrap);
    assert!(config.border_number_styles().contains("Rn"));
    assert!(!config.border_number_styles().contains("RandNummer"));

    let input = dir.path().join("urteil.docx");
    fs::write(
        &input,
        DocxBuilder::new()
            .body(&format!("{}{}", styled("Rn", "7"), paragraph("", "Text")))
            .build(),
    )
    .unwrap();
    let document = pipeline::convert_file(&input, &config).unwrap();
    assert_eq!(document.border_number_count(), 1);
}

#[test]
fn test_default_config_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caselaw-docx.toml");
    ConverterConfig::default().save(&path).unwrap();
    assert_eq!(
        ConverterConfig::load(&path).unwrap(),
        ConverterConfig::default()
    );
}
