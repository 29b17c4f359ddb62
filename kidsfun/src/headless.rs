//! Headless mode.
//!
//! A simple text-based interface for scripts and automated testing.

use kidsfun_core::activities::{
    Category, Difficulty, DrawingTimer, MathProblem, Operation, BUILDER_STEPS,
};
use kidsfun_core::{Session, StoryPrompt, StoryView};
use std::io::{self, BufRead};

/// Run the activities in headless mode.
///
/// This provides a simple line-oriented protocol:
/// - A bare number picks that choice (1-based) in the story adventure
/// - Lines starting with `#` are commands (see `#help`)
/// - All other output is story text or status
pub async fn run_headless(mut session: Session) -> anyhow::Result<()> {
    println!("=== Kids Fun Learning Adventures (headless) ===");
    println!();
    print_help();
    println!();

    let view = session.story_mut().start();
    print_view(&view);

    // Open drawing visit, saved by #draw or on exit
    let mut drawing: Option<DrawingTimer> = None;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('#') {
            let parts: Vec<&str> = command.split_whitespace().collect();
            match parts.first().copied() {
                Some("quit") | Some("exit") => {
                    println!("Goodbye!");
                    break;
                }
                Some("story") => print_view(&session.story().current()),
                Some("restart") => print_view(&session.story_mut().restart()),
                Some("imagine") => imagine(&mut session, &parts[1..]),
                Some("build") => build(&mut session, parts.get(1).copied()),
                Some("newstory") => {
                    session.builder_mut().reset();
                    print_builder_step(&session);
                }
                Some("tell") => tell(&session).await,
                Some("math") => math(&session, &parts[1..]),
                Some("problem") => problem(parts.get(1).copied()),
                Some("draw") => draw(&session, &mut drawing),
                Some("stroke") => stroke(&mut drawing, parts.get(1).copied()),
                Some("insights") => insights(&session).await,
                Some("report") => {
                    println!("[REPORT]");
                    print!("{}", session.report().render_text());
                }
                Some("help") => print_help(),
                _ => println!("[ERROR] Unknown command. Type #help for commands."),
            }
            continue;
        }

        match parse_choice(line) {
            Some(index) => match session.story_mut().choose(index) {
                Ok(view) => print_view(&view),
                Err(e) => println!("[ERROR] {e}"),
            },
            None => println!("[ERROR] Type a choice number, or #help for commands."),
        }
    }

    if drawing.is_some() {
        draw(&session, &mut drawing);
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  <n>                 - Pick choice n in the story adventure");
    println!("  #story              - Show the current story page");
    println!("  #restart            - Start the story adventure again");
    println!("  #imagine <c> <s> <a> - Pick a character, place and activity");
    println!("  #build <n>          - Pick option n in the story builder");
    println!("  #newstory           - Start a new story in the builder");
    println!("  #tell               - Ask the storyteller to tell the built story");
    println!("  #math <a> <op> <b> <answer> - Check a math answer (op: + - x)");
    println!("  #problem [level]    - Make a problem (easy, medium, hard)");
    println!("  #draw               - Open or close the drawing studio");
    println!("  #stroke [n]         - Draw n brush strokes (default 1)");
    println!("  #report             - Show the parent report");
    println!("  #insights           - Ask for AI insights about the report");
    println!("  #quit               - Exit");
}

/// Parse a 1-based choice number into an index.
fn parse_choice(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

fn print_view(view: &StoryView) {
    println!("[STORY] {}", view.text);
    if view.is_ending() {
        println!("[END] Type #restart to play again.");
        return;
    }
    for (i, label) in view.choices.iter().enumerate() {
        println!("  {}. {label}", i + 1);
    }
}

fn imagine(session: &mut Session, args: &[&str]) {
    if args.len() != Category::ALL.len() {
        println!("[ERROR] Usage: #imagine <character> <place> <activity>");
        for category in Category::ALL {
            let options: Vec<String> = category
                .options()
                .iter()
                .enumerate()
                .map(|(i, o)| format!("{}={o}", i + 1))
                .collect();
            println!("  {}: {}", category.title(), options.join(", "));
        }
        return;
    }

    let mut idea = None;
    for (category, arg) in Category::ALL.into_iter().zip(args) {
        let Some(index) = parse_choice(arg) else {
            println!("[ERROR] '{arg}' is not a number");
            return;
        };
        match session.imagination_mut().select(category, index) {
            Ok(result) => idea = result,
            Err(e) => {
                println!("[ERROR] {e}");
                return;
            }
        }
    }

    if let Some(idea) = idea {
        println!("[IDEA] {idea}");
    }
}

fn print_builder_step(session: &Session) {
    let Some(step) = session.builder().current_step() else {
        return;
    };
    println!(
        "[BUILD] Step {}/{}: {}",
        session.builder().step_index() + 1,
        BUILDER_STEPS.len(),
        step.title
    );
    for (i, option) in step.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
}

fn build(session: &mut Session, arg: Option<&str>) {
    let Some(index) = arg.and_then(parse_choice) else {
        print_builder_step(session);
        return;
    };

    match session.builder_mut().choose(index) {
        Ok(Some(selections)) => println!("[BUILT] {}", selections.story_text()),
        Ok(None) => print_builder_step(session),
        Err(e) => println!("[ERROR] {e}"),
    }
}

async fn tell(session: &Session) {
    let Some(selections) = session.builder().selections() else {
        println!("[ERROR] Finish the story builder first (#build).");
        return;
    };

    match session
        .tell_story(&StoryPrompt::from_selections(selections))
        .await
    {
        Ok(story) => {
            println!("[TOLD] {}", story.text);
            if let Some(image) = story.image {
                println!("[IMAGE] {image}");
            }
        }
        Err(e) => println!("[ERROR] {}", e.user_message()),
    }
}

fn math(session: &Session, args: &[&str]) {
    let parsed = match args {
        [a, op, b, answer] => parse_operation(op).and_then(|op| {
            Some((
                MathProblem::new(a.parse().ok()?, op, b.parse().ok()?),
                answer.parse::<i64>().ok(),
            ))
        }),
        _ => None,
    };

    let Some((problem, given)) = parsed else {
        println!("[ERROR] Usage: #math <a> <op> <b> <answer>");
        return;
    };

    match session.answer_math(&problem, given) {
        Ok(outcome) => println!(
            "[MATH] {problem} {} (score {}/{})",
            outcome.feedback, outcome.score.correct, outcome.score.attempts
        ),
        Err(e) => println!("[ERROR] {e}"),
    }
}

fn problem(level: Option<&str>) {
    let difficulty = match level.map(str::to_ascii_lowercase).as_deref() {
        None | Some("easy") => Difficulty::Easy,
        Some("medium") => Difficulty::Medium,
        Some("hard") => Difficulty::Hard,
        Some(other) => {
            println!("[ERROR] Unknown level '{other}'. Use easy, medium or hard.");
            return;
        }
    };
    println!("[PROBLEM] {}", MathProblem::generate(difficulty));
}

/// Open a drawing visit, or close the open one and save it.
fn draw(session: &Session, drawing: &mut Option<DrawingTimer>) {
    match drawing.take() {
        None => {
            *drawing = Some(DrawingTimer::start());
            println!("[DRAW] Drawing studio open. Use #stroke, then #draw to finish.");
        }
        Some(timer) => match session.finish_drawing(timer) {
            Ok(totals) => println!(
                "[DRAW] Saved. {} strokes and {}s of drawing in total.",
                totals.strokes, totals.seconds
            ),
            Err(e) => println!("[ERROR] {e}"),
        },
    }
}

fn stroke(drawing: &mut Option<DrawingTimer>, count: Option<&str>) {
    let Some(timer) = drawing else {
        println!("[ERROR] Open the drawing studio first (#draw).");
        return;
    };
    let Some(count) = count.map_or(Some(1), |c| c.parse::<u64>().ok()) else {
        println!("[ERROR] Usage: #stroke [n]");
        return;
    };
    timer.record_strokes(count);
    println!("[DRAW] {} strokes this visit", timer.strokes());
}

async fn insights(session: &Session) {
    match session.learning_insights().await {
        Ok(insights) => println!("[INSIGHTS] {}", insights.text),
        Err(e) => println!("[ERROR] {}", e.insights_message()),
    }
}

fn parse_operation(op: &str) -> Option<Operation> {
    match op {
        "+" => Some(Operation::Add),
        "-" => Some(Operation::Subtract),
        "x" | "*" | "×" => Some(Operation::Multiply),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_is_one_based() {
        assert_eq!(parse_choice("1"), Some(0));
        assert_eq!(parse_choice("3"), Some(2));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("dragon"), None);
    }

    #[test]
    fn test_parse_operation() {
        assert_eq!(parse_operation("+"), Some(Operation::Add));
        assert_eq!(parse_operation("x"), Some(Operation::Multiply));
        assert_eq!(parse_operation("/"), None);
    }

    #[test]
    fn test_draw_command_saves_visit() {
        let harness = kidsfun_core::TestHarness::new().unwrap();
        let mut drawing = None;

        draw(&harness.session, &mut drawing);
        stroke(&mut drawing, Some("5"));
        stroke(&mut drawing, None);
        assert_eq!(drawing.map(|t| t.strokes()), Some(6));

        draw(&harness.session, &mut drawing);
        assert!(drawing.is_none());
        assert_eq!(
            harness.metric(kidsfun_core::metrics::keys::DRAWING_STROKES),
            6
        );
    }

    #[test]
    fn test_overflowing_math_records_nothing() {
        let harness = kidsfun_core::TestHarness::new().unwrap();
        math(&harness.session, &["9223372036854775807", "+", "1", "0"]);
        assert!(harness.metrics().is_empty());
    }
}
