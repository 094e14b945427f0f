//! Rubric batch grading entrypoint.

use std::path::{Path, PathBuf};

use mimalloc::MiMalloc;

use rubric::config::Config;
use rubric::document::{ProcessedAnswerKey, ProcessedSubmission};
use rubric::pipeline::{
    self, GradingContext, PipelineError, key_review_tasks, process_answer_key, process_submission,
    read_answer_key, read_submission, student_review_tasks, write_review_file,
};
use rubric::structure::GenaiBackend;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██████╗ ██╗   ██╗██████╗ ██████╗ ██╗ ██████╗
██╔══██╗██║   ██║██╔══██╗██╔══██╗██║██╔════╝
██████╔╝██║   ██║██████╔╝██████╔╝██║██║
██╔══██╗██║   ██║██╔══██╗██╔══██╗██║██║
██║  ██║╚██████╔╝██████╔╝██║  ██║██║╚██████╗
╚═╝  ╚═╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═╝╚═╝ ╚═════╝

        SEGMENT. SCORE. GRADE.
                                        AGPL-3.0
"#
    );

    let mut data_dir = PathBuf::from("./data");
    let mut force_fallback = false;
    let mut export_review = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let Some(value) = args.next() else {
                    anyhow::bail!("--data-dir requires a path");
                };
                data_dir = PathBuf::from(value);
            }
            "--fallback" => force_fallback = true,
            "--export-review" => export_review = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = Config::from_env()?;
    if force_fallback {
        config.use_structure_fallback = true;
    }
    config.validate()?;

    let run_id = uuid::Uuid::new_v4();
    let started = chrono::Utc::now();
    tracing::info!(
        run_id = %run_id,
        data_dir = %data_dir.display(),
        segmentation_model = config.segmentation_model.as_str(),
        structure_fallback = config.use_structure_fallback,
        "Rubric grading run starting"
    );

    let ctx = GradingContext::load(&config)?;

    let key_path = data_dir.join("answer_key.json");
    let raw_key = read_answer_key(&key_path)?;
    let (processed_key, key_report) = process_answer_key(&ctx, &raw_key).await;
    pipeline::write_document(&data_dir.join("answer_key_processed.json"), &processed_key)?;
    tracing::info!(
        questions = key_report.questions,
        processed = key_report.processed(),
        defaulted = key_report.defaulted.len(),
        fallback_decompositions = key_report.fallback_decompositions.len(),
        "Answer key written"
    );

    let submissions_dir = data_dir.join("student_answers");
    let processed_dir = data_dir.join("processed");
    let submission_paths = collect_submission_paths(&submissions_dir)?;
    if !submission_paths.is_empty() {
        std::fs::create_dir_all(&processed_dir)?;
    }

    let mut review_tasks = if export_review {
        key_review_tasks(&processed_key)
    } else {
        Vec::new()
    };

    let mut graded = 0usize;
    let mut failed = 0usize;
    for path in &submission_paths {
        let stem = submission_stem(path);
        match grade_submission(&ctx, &processed_key, path, &processed_dir).await {
            Ok(processed) => {
                graded += 1;
                if export_review {
                    review_tasks.extend(student_review_tasks(&processed));
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!(submission = stem, error = %e, "Submission failed, continuing");
            }
        }
    }

    if export_review {
        let review_path = data_dir.join("review_tasks.jsonl");
        write_review_file(&review_path, &review_tasks)?;
        tracing::info!(
            path = %review_path.display(),
            tasks = review_tasks.len(),
            "Review tasks written"
        );
    }

    let elapsed = chrono::Utc::now() - started;
    tracing::info!(
        run_id = %run_id,
        graded,
        failed,
        elapsed_ms = elapsed.num_milliseconds(),
        "Rubric grading run complete"
    );

    Ok(())
}

fn collect_submission_paths(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "No student answers directory, processing answer key only"
            );
            return Ok(Vec::new());
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

fn submission_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("submission")
}

async fn grade_submission(
    ctx: &GradingContext<GenaiBackend>,
    key: &ProcessedAnswerKey,
    path: &Path,
    processed_dir: &Path,
) -> Result<ProcessedSubmission, PipelineError> {
    let raw = read_submission(path)?;
    let (processed, report) = process_submission(ctx, key, &raw).await;

    let out_path = processed_dir.join(format!("{}_processed.json", submission_stem(path)));
    pipeline::write_document(&out_path, &processed)?;
    tracing::info!(
        submission = submission_stem(path),
        graded = report.graded(),
        fully_graded = report.all_graded(),
        output = %out_path.display(),
        "Submission written"
    );

    Ok(processed)
}
