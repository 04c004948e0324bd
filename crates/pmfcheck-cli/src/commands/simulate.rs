use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use pmfcheck_core::{AssessmentEngine, Event, Question, Step, Variant};
use serde::Deserialize;

use super::{load_session, SessionArgs};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Scripted answers: a JSON array of strings, or a JSON/TOML document
    /// with `answers` and an optional `category`
    #[arg(long, value_name = "FILE")]
    pub answers: Option<PathBuf>,
    /// Email used to unlock the report
    #[arg(long, default_value = "founder@startup.com")]
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
struct Script {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    answers: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    List(Vec<String>),
    Script(Script),
}

fn load_script(path: &Path) -> Result<Script, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let file: ScriptFile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => ScriptFile::Script(toml::from_str(&raw)?),
        _ => serde_json::from_str(&raw)?,
    };
    Ok(match file {
        ScriptFile::List(answers) => Script {
            category: None,
            answers,
        },
        ScriptFile::Script(script) => script,
    })
}

/// Built-in answer when the script runs out.
fn sample_answer(question: &Question) -> String {
    match question.options.first() {
        Some(option) if !question.is_free_text() => option.id.clone(),
        _ => format!("Sample answer to question {} for a seed-stage B2B SaaS.", question.step),
    }
}

fn emit(out: &mut impl Write, events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
    }
    Ok(())
}

pub fn run(args: SimulateArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, content) = load_session(&args.session, config_path)?;
    let script = match &args.answers {
        Some(path) => load_script(path)?,
        None => Script::default(),
    };
    let mut engine = AssessmentEngine::new(content, config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    emit(&mut out, &engine.opening_events())?;
    emit(&mut out, &engine.run_until_idle())?;

    if engine.step() == Step::CategorySelect {
        let category = match &script.category {
            Some(id) => id.clone(),
            None => engine
                .content()
                .categories
                .first()
                .map(|c| c.id.clone())
                .ok_or("no categories configured")?,
        };
        emit(&mut out, &engine.select_category(&category)?)?;
        emit(&mut out, &engine.run_until_idle())?;
    }

    let mut scripted = script.answers.into_iter();
    while let Some(question) = engine.current_question().cloned() {
        let answer = scripted.next().unwrap_or_else(|| sample_answer(&question));
        let events = engine
            .answer_question(&answer)
            .map_err(|e| format!("question {}: {e}", question.step))?;
        emit(&mut out, &events)?;
        emit(&mut out, &engine.run_until_idle())?;
    }

    if let Some(view) = engine.analysis_view() {
        emit(&mut out, &engine.tick(view.remaining_ms(engine.analysis_timing())))?;
    }
    emit(&mut out, &engine.complete_analysis()?)?;
    if engine.variant() == Variant::Chat {
        emit(&mut out, &engine.show_email_gate()?)?;
    }
    emit(&mut out, &engine.submit_email(&args.email)?)?;
    emit(&mut out, &engine.run_until_idle())?;

    tracing::debug!(
        session = engine.session_id(),
        elapsed_ms = engine.now_ms(),
        started_at = %engine.started_at().to_rfc3339(),
        "simulation finished"
    );
    emit(&mut out, &engine.dispose())?;
    Ok(())
}
