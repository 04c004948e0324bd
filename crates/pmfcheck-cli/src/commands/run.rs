use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use clap::Args;
use pmfcheck_core::{
    AssessmentEngine, Event, MessageKind, Question, ReportView, Role, Step, Variant,
};

use super::{load_session, SessionArgs};

/// Refresh rate of the analysis loader.
const FRAME_MS: u64 = 500;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Skip the pauses between steps
    #[arg(long)]
    pub fast: bool,
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, content) = load_session(&args.session, config_path)?;
    let mut engine = AssessmentEngine::new(content, config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("PMF check ({} variant)", engine.variant());
    render(&engine, &engine.opening_events());
    wait_for_timers(&mut engine, args.fast);

    loop {
        let step = engine.step();
        let events = match step {
            Step::CategorySelect => {
                print_categories(&engine);
                let Some(line) = prompt(&mut input, "> ")? else {
                    break;
                };
                let id = pick_category(&engine, &line);
                engine.select_category(&id)
            }
            Step::Question(_) => {
                let Some(question) = engine.current_question().cloned() else {
                    break;
                };
                print_question(&engine, &question);
                let Some(line) = prompt(&mut input, "> ")? else {
                    break;
                };
                engine.answer_question(&resolve_option(&question, &line))
            }
            Step::Analysis => {
                animate_analysis(&mut engine, args.fast)?;
                engine.complete_analysis()
            }
            Step::Preview => {
                print_preview(&engine);
                if engine.variant() == Variant::Chat {
                    engine.show_email_gate()
                } else {
                    submit_email(&mut engine, &mut input)?
                }
            }
            Step::EmailGate => submit_email(&mut engine, &mut input)?,
            Step::Report => {
                print_report(&engine);
                let took = chrono::Utc::now() - engine.started_at();
                println!();
                println!("Completed in {}m {}s", took.num_minutes(), took.num_seconds() % 60);
                break;
            }
        };

        match events {
            Ok(events) => render(&engine, &events),
            Err(e) => {
                println!("  ! {e}");
                continue;
            }
        }
        wait_for_timers(&mut engine, args.fast);
    }

    engine.dispose();
    Ok(())
}

/// Read one line; `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn submit_email(
    engine: &mut AssessmentEngine,
    input: &mut impl BufRead,
) -> Result<Result<Vec<Event>, pmfcheck_core::AssessmentError>, Box<dyn std::error::Error>> {
    match prompt(input, "email> ")? {
        Some(line) => Ok(engine.submit_email(line.trim())),
        None => Err("input closed before the report was unlocked".into()),
    }
}

/// Sleep through pending transitions, rendering what they emit.
fn wait_for_timers(engine: &mut AssessmentEngine, fast: bool) {
    while let Some(due) = engine.next_due_ms() {
        let delta = due.saturating_sub(engine.now_ms());
        if !fast {
            thread::sleep(Duration::from_millis(delta));
        }
        let events = engine.tick(delta);
        render(engine, &events);
    }
}

fn animate_analysis(engine: &mut AssessmentEngine, fast: bool) -> io::Result<()> {
    let mut last_fact = None;
    while let Some(view) = engine.analysis_view() {
        let content = engine.content();
        if let Some(label) = content.loading_labels.get(view.label_index) {
            print!("\r  [{:>3.0}%] {label:<48}", view.progress_pct);
            io::stdout().flush()?;
        }
        if last_fact != Some(view.fact_index) {
            if let Some(fact) = content.facts.get(view.fact_index) {
                println!("\n  > {}: {}", fact.title, fact.description);
            }
            last_fact = Some(view.fact_index);
        }
        if view.finished {
            println!();
            break;
        }
        let step = view.remaining_ms(engine.analysis_timing()).min(FRAME_MS);
        if !fast {
            thread::sleep(Duration::from_millis(step));
        }
        engine.tick(step);
    }
    Ok(())
}

fn render(engine: &AssessmentEngine, events: &[Event]) {
    let chat = engine.variant() == Variant::Chat;
    for event in events {
        match event {
            Event::MessageAppended { role: Role::Bot, kind, content, .. } => match kind {
                // Rendered by the step loop with their options.
                MessageKind::Question | MessageKind::Categories => {}
                MessageKind::Insight => println!("bot: * {content}"),
                _ => println!("bot: {content}"),
            },
            Event::TypingStarted { .. } => println!("bot is typing..."),
            Event::InsightShown { text, .. } if !chat => println!("  * {text}"),
            Event::AnalysisStarted { .. } if !chat => println!("Analyzing your responses..."),
            _ => {}
        }
    }
}

fn print_categories(engine: &AssessmentEngine) {
    let intro = engine
        .transcript()
        .iter()
        .rev()
        .find(|m| m.kind == MessageKind::Categories);
    if let Some(message) = intro {
        println!("bot: {}", message.content);
    }
    for (i, c) in engine.content().categories.iter().enumerate() {
        println!("  {}. {} {} - {}", i + 1, c.icon, c.title, c.description);
        println!("     {} founders chose this", c.count);
    }
}

fn print_question(engine: &AssessmentEngine, question: &Question) {
    let prefix = if engine.variant() == Variant::Chat { "bot: " } else { "" };
    println!();
    println!(
        "{prefix}[{}/{}] {}",
        question.step,
        engine.total_questions(),
        question.prompt
    );
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option.label);
    }
    if let Some(placeholder) = &question.placeholder {
        println!("  ({placeholder})");
    }
}

fn print_preview(engine: &AssessmentEngine) {
    if let Some(ReportView::Locked { preview }) = engine.report() {
        println!();
        for signal in preview {
            println!("  {} {}: {}", signal.emoji, signal.title, signal.description);
        }
        let locked = engine.content().report.len().saturating_sub(preview.len());
        println!("  ({locked} more sections locked)");
    }
}

fn print_report(engine: &AssessmentEngine) {
    let Some(ReportView::Unlocked { sections }) = engine.report() else {
        return;
    };
    for section in sections {
        println!();
        println!("{} {}", section.icon, section.title);
        println!("{}", section.content);
        for metric in &section.metrics {
            println!("  - {}: {} {}", metric.label, metric.value, metric.trend.arrow());
        }
    }
}

/// Category by 1-based number or id.
fn pick_category(engine: &AssessmentEngine, line: &str) -> String {
    let line = line.trim();
    let categories = &engine.content().categories;
    line.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| categories.get(i))
        .map(|c| c.id.clone())
        .unwrap_or_else(|| line.to_string())
}

/// Option by 1-based number, otherwise the raw text.
fn resolve_option(question: &Question, line: &str) -> String {
    if question.is_free_text() {
        return line.to_string();
    }
    line.trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| question.options.get(i))
        .map(|o| o.id.clone())
        .unwrap_or_else(|| line.trim().to_string())
}
