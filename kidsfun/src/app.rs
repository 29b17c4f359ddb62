//! Main application state and logic

use kidsfun_core::activities::{
    AnswerOutcome, Category, Difficulty, DrawingTimer, MathProblem, BUILDER_STEPS,
};
use kidsfun_core::{CollaboratorError, Report, Session, StoryPrompt, StoryView};

use crate::canvas::Canvas;
use crate::ui::theme::KidsTheme;

/// Longest answer the math screen accepts, in characters
const MAX_ANSWER_LEN: usize = 6;

/// Which activity is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Menu,
    Math,
    Adventure,
    Drawing,
    Imagination,
    Builder,
    Report,
}

impl Screen {
    /// Activities listed on the menu, in order
    pub const MENU: [Screen; 6] = [
        Screen::Math,
        Screen::Adventure,
        Screen::Drawing,
        Screen::Imagination,
        Screen::Builder,
        Screen::Report,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Menu => "Kids Fun Learning Adventures",
            Screen::Math => "Math Adventure",
            Screen::Adventure => "Story Adventure",
            Screen::Drawing => "Drawing Studio",
            Screen::Imagination => "Imagination Explorer",
            Screen::Builder => "Story Builder",
            Screen::Report => "Parent Report",
        }
    }
}

/// Work for the storyteller, awaited by the event loop between frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorytellerRequest {
    /// Expand the child's picks into a story
    Story(StoryPrompt),
    /// Analyze the metrics for the parent report
    Insights,
}

/// Main application state
pub struct App {
    pub session: Session,
    pub theme: KidsTheme,
    pub screen: Screen,
    pub menu_index: usize,

    // Math adventure
    pub difficulty: Difficulty,
    pub problem: MathProblem,
    pub math_input: String,
    pub math_outcome: Option<AnswerOutcome>,

    // Story adventure
    pub adventure: StoryView,

    // Drawing studio; the timer runs while the screen is open
    pub canvas: Canvas,
    drawing_timer: Option<DrawingTimer>,

    // Imagination explorer
    pub category_index: usize,
    pub idea: Option<String>,

    // Story builder
    pub built_story: Option<String>,

    // Storyteller
    pub pending_request: Option<StorytellerRequest>,
    pub generated: Option<String>,

    // Parent report, rebuilt each time the screen opens
    pub report: Option<Report>,

    // Status
    status_message: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    /// Create the application over a session
    pub fn new(mut session: Session) -> Self {
        let adventure = session.story_mut().start();
        Self {
            session,
            theme: KidsTheme::default(),
            screen: Screen::Menu,
            menu_index: 0,
            difficulty: Difficulty::default(),
            problem: MathProblem::generate(Difficulty::default()),
            math_input: String::new(),
            math_outcome: None,
            adventure,
            canvas: Canvas::new(),
            drawing_timer: None,
            category_index: 0,
            idea: None,
            built_story: None,
            pending_request: None,
            generated: None,
            report: None,
            status_message: None,
            show_help: false,
            should_quit: false,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn open(&mut self, screen: Screen) {
        let leaving_drawing = self.screen == Screen::Drawing && screen != Screen::Drawing;
        self.screen = screen;
        self.generated = None;
        self.status_message = None;

        if leaving_drawing {
            self.finish_drawing();
        }
        match screen {
            Screen::Drawing if self.drawing_timer.is_none() => {
                self.drawing_timer = Some(DrawingTimer::start());
            }
            Screen::Report => self.report = Some(self.session.report()),
            _ => {}
        }
    }

    /// Save anything still in progress before the app exits
    pub fn shutdown(&mut self) {
        self.finish_drawing();
    }

    pub fn open_selected(&mut self) {
        if let Some(&screen) = Screen::MENU.get(self.menu_index) {
            self.open(screen);
        }
    }

    pub fn back_to_menu(&mut self) {
        self.open(Screen::Menu);
    }

    pub fn menu_down(&mut self) {
        self.menu_index = (self.menu_index + 1) % Screen::MENU.len();
    }

    pub fn menu_up(&mut self) {
        self.menu_index = (self.menu_index + Screen::MENU.len() - 1) % Screen::MENU.len();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // =========================================================================
    // Math adventure
    // =========================================================================

    /// Type one character of the answer
    pub fn math_type(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || (c == '-' && self.math_input.is_empty());
        if accepted && self.math_input.len() < MAX_ANSWER_LEN {
            self.math_input.push(c);
        }
    }

    pub fn math_backspace(&mut self) {
        self.math_input.pop();
    }

    /// Check the typed answer, then move on to a fresh problem
    pub fn submit_math(&mut self) {
        // Anything that is not a number still counts as an attempt
        let given = self.math_input.parse::<i64>().ok();
        match self.session.answer_math(&self.problem, given) {
            Ok(outcome) => {
                self.math_outcome = Some(outcome);
                self.status_message = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, problem = %self.problem, "math answer not recorded");
                self.set_status("Couldn't check that one. Here's a new problem!");
            }
        }
        self.next_problem();
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.next();
        self.math_outcome = None;
        self.next_problem();
    }

    fn next_problem(&mut self) {
        self.problem = MathProblem::generate(self.difficulty);
        self.math_input.clear();
    }

    // =========================================================================
    // Drawing studio
    // =========================================================================

    pub fn move_brush(&mut self, dx: i16, dy: i16) {
        if self.canvas.move_brush(dx, dy) {
            self.record_stroke();
        }
    }

    pub fn toggle_pen(&mut self) {
        if self.canvas.toggle_pen() {
            self.record_stroke();
        }
    }

    pub fn clear_canvas(&mut self) {
        self.canvas.clear();
    }

    /// The visit in progress, if the studio is open
    pub fn drawing_timer(&self) -> Option<&DrawingTimer> {
        self.drawing_timer.as_ref()
    }

    fn record_stroke(&mut self) {
        if let Some(timer) = &mut self.drawing_timer {
            timer.record_stroke();
        }
    }

    fn finish_drawing(&mut self) {
        let Some(timer) = self.drawing_timer.take() else {
            return;
        };
        match self.session.finish_drawing(timer) {
            Ok(totals) => tracing::debug!(
                seconds = totals.seconds,
                strokes = totals.strokes,
                "drawing visit finished"
            ),
            Err(e) => {
                tracing::warn!(error = %e, "drawing visit not saved");
                self.set_status("Your drawing time couldn't be saved.");
            }
        }
    }

    // =========================================================================
    // Story adventure
    // =========================================================================

    pub fn choose_story(&mut self, index: usize) {
        match self.session.story_mut().choose(index) {
            Ok(view) => {
                self.adventure = view;
                self.status_message = None;
            }
            // The view is unchanged; just say so
            Err(_) if self.adventure.is_ending() => {
                self.set_status("The End! Press r to play again.")
            }
            Err(_) => self.set_status("That choice isn't here. Pick a number from the list."),
        }
    }

    pub fn restart_story(&mut self) {
        self.adventure = self.session.story_mut().restart();
        self.status_message = None;
    }

    // =========================================================================
    // Imagination explorer
    // =========================================================================

    pub fn category(&self) -> Category {
        Category::ALL[self.category_index % Category::ALL.len()]
    }

    pub fn next_category(&mut self) {
        self.category_index = (self.category_index + 1) % Category::ALL.len();
    }

    pub fn previous_category(&mut self) {
        self.category_index = (self.category_index + Category::ALL.len() - 1) % Category::ALL.len();
    }

    pub fn pick_idea(&mut self, index: usize) {
        let category = self.category();
        match self.session.imagination_mut().select(category, index) {
            Ok(idea) => {
                if idea.is_some() {
                    self.idea = idea;
                    self.generated = None;
                } else {
                    self.next_category();
                }
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    // =========================================================================
    // Story builder
    // =========================================================================

    pub fn choose_builder(&mut self, index: usize) {
        match self.session.builder_mut().choose(index) {
            Ok(Some(selections)) => {
                self.built_story = Some(selections.story_text());
                self.status_message = None;
            }
            Ok(None) => self.status_message = None,
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn new_builder_story(&mut self) {
        self.session.builder_mut().reset();
        self.built_story = None;
        self.generated = None;
    }

    /// Header for the builder's current step, e.g. "Step 2/4: Choose a sidekick"
    pub fn builder_heading(&self) -> Option<String> {
        let step = self.session.builder().current_step()?;
        Some(format!(
            "Step {}/{}: {}",
            self.session.builder().step_index() + 1,
            BUILDER_STEPS.len(),
            step.title
        ))
    }

    // =========================================================================
    // Storyteller
    // =========================================================================

    /// Queue a storyteller request for the current screen's finished picks.
    pub fn request_story(&mut self) {
        if !self.session.has_storyteller() {
            self.set_status("Story magic is switched off. Ask a grown-up to set it up!");
            return;
        }

        let prompt = match self.screen {
            Screen::Builder => self
                .session
                .builder()
                .selections()
                .map(StoryPrompt::from_selections),
            Screen::Imagination => self.idea.as_deref().map(StoryPrompt::from_idea),
            _ => None,
        };

        match prompt {
            Some(prompt) => self.pending_request = Some(StorytellerRequest::Story(prompt)),
            None => self.set_status("Finish picking first, then press t!"),
        }
    }

    /// Queue an analysis of the metrics for the parent report.
    pub fn request_insights(&mut self) {
        if self.session.has_storyteller() {
            self.pending_request = Some(StorytellerRequest::Insights);
        } else {
            self.set_status(CollaboratorError::NotConfigured.insights_message());
        }
    }

    /// Await a queued request and show what comes back.
    pub async fn fulfil_request(&mut self, request: StorytellerRequest) {
        let (result, done) = match &request {
            StorytellerRequest::Story(prompt) => {
                (self.session.tell_story(prompt).await, "Here is your story!")
            }
            StorytellerRequest::Insights => (
                self.session.learning_insights().await,
                "Here are some insights for grown-ups.",
            ),
        };

        match result {
            Ok(story) => {
                self.generated = Some(story.text);
                self.set_status(done);
            }
            Err(e) if request == StorytellerRequest::Insights => {
                self.set_status(e.insights_message())
            }
            Err(e) => self.set_status(e.user_message()),
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kidsfun_core::metrics::keys;
    use kidsfun_core::story::content;
    use kidsfun_core::{MetricsStore, MockStoryTeller, TestHarness};
    use std::sync::Arc;

    fn app() -> App {
        App::new(TestHarness::new().unwrap().session)
    }

    #[test]
    fn test_menu_lists_every_activity() {
        assert_eq!(Screen::MENU[0], Screen::Math);
        assert!(Screen::MENU.contains(&Screen::Drawing));
        assert_eq!(Screen::MENU[Screen::MENU.len() - 1], Screen::Report);
    }

    #[test]
    fn test_menu_wraps() {
        let mut app = app();
        app.menu_up();
        assert_eq!(app.menu_index, Screen::MENU.len() - 1);
        app.menu_down();
        assert_eq!(app.menu_index, 0);
    }

    #[test]
    fn test_adventure_choices() {
        let mut app = app();
        app.open(Screen::Adventure);
        app.choose_story(0);
        assert_eq!(app.adventure.node.as_str(), "dragon");

        app.choose_story(7);
        assert_eq!(app.adventure.node.as_str(), "dragon");
        assert!(app.status().is_some());

        app.choose_story(0);
        app.choose_story(0);
        assert!(app.status().unwrap().contains("The End"));

        app.restart_story();
        assert_eq!(app.adventure.node.as_str(), "start");
        assert_eq!(app.session.metrics().load().get(keys::STORY_DRAGON), 1);
    }

    #[test]
    fn test_imagination_advances_category() {
        let mut app = app();
        app.open(Screen::Imagination);
        app.pick_idea(0);
        assert_eq!(app.category(), Category::Setting);
        app.pick_idea(0);
        app.pick_idea(0);
        assert!(app.idea.as_deref().unwrap().starts_with("Imagine a"));
    }

    #[test]
    fn test_builder_and_story_request() {
        let harness = TestHarness::with_storyteller(MockStoryTeller::new().with_story("Hi")).unwrap();
        let mut app = App::new(harness.session);
        app.open(Screen::Builder);

        app.request_story();
        assert!(app.pending_request.is_none());

        for _ in 0..BUILDER_STEPS.len() {
            app.choose_builder(1);
        }
        assert!(app.built_story.as_deref().unwrap().contains("Sparkly Unicorn"));
        assert!(app.builder_heading().is_none());

        app.request_story();
        assert!(matches!(
            app.pending_request,
            Some(StorytellerRequest::Story(_))
        ));

        app.new_builder_story();
        assert_eq!(app.builder_heading().unwrap(), "Step 1/4: Choose a hero");
    }

    #[test]
    fn test_report_built_on_open() {
        let mut app = app();
        app.choose_story(0);
        app.open(Screen::Report);
        let report = app.report.as_ref().unwrap();
        let dragon = report.rows.iter().find(|r| r.key == keys::STORY_DRAGON).unwrap();
        assert_eq!(dragon.value, 1);
    }

    #[test]
    fn test_math_answer_is_recorded() {
        let mut app = app();
        app.open(Screen::Math);
        let answer = app.problem.answer().unwrap();
        for c in answer.to_string().chars() {
            app.math_type(c);
        }
        let asked = app.problem;
        app.submit_math();

        let outcome = app.math_outcome.as_ref().unwrap();
        assert!(outcome.correct, "{asked} answered with {answer}");
        assert!(app.math_input.is_empty());
        let metrics = app.session.metrics().load();
        assert_eq!(metrics.get(keys::MATH_ATTEMPTS), 1);
        assert_eq!(metrics.get(keys::MATH_CORRECT), 1);
    }

    #[test]
    fn test_math_input_filters_keys() {
        let mut app = app();
        app.math_type('-');
        app.math_type('4');
        app.math_type('-');
        app.math_type('x');
        assert_eq!(app.math_input, "-4");
        app.math_backspace();
        assert_eq!(app.math_input, "-");

        // An empty or partial answer still counts as a try
        app.submit_math();
        assert!(!app.math_outcome.as_ref().unwrap().correct);
        assert_eq!(app.session.metrics().load().get(keys::MATH_ATTEMPTS), 1);
    }

    #[test]
    fn test_cycle_difficulty_changes_problem_set() {
        let mut app = app();
        app.math_type('9');
        app.cycle_difficulty();
        assert_eq!(app.difficulty, Difficulty::Medium);
        assert!(app.math_input.is_empty());
    }

    #[test]
    fn test_drawing_visit_saved_on_leave() {
        let mut app = app();
        app.move_brush(1, 0);
        assert!(app.drawing_timer().is_none());

        app.open(Screen::Drawing);
        app.toggle_pen();
        app.move_brush(1, 0);
        app.move_brush(0, 1);
        app.move_brush(0, 0);
        assert_eq!(app.drawing_timer().unwrap().strokes(), 3);

        app.back_to_menu();
        assert!(app.drawing_timer().is_none());
        let metrics = app.session.metrics().load();
        assert_eq!(metrics.get(keys::DRAWING_STROKES), 3);
        assert!(metrics.contains(keys::DRAWING_TIME));
    }

    #[test]
    fn test_drawing_visit_saved_on_shutdown() {
        let mut app = app();
        app.open(Screen::Drawing);
        app.toggle_pen();
        app.shutdown();
        assert_eq!(app.session.metrics().load().get(keys::DRAWING_STROKES), 1);

        // Nothing left to save the second time
        app.shutdown();
        assert_eq!(app.session.metrics().load().get(keys::DRAWING_STROKES), 1);
    }

    #[tokio::test]
    async fn test_insights_request_fills_panel() {
        let harness =
            TestHarness::with_storyteller(MockStoryTeller::new().with_story("Enjoys dragons."))
                .unwrap();
        let storyteller = harness.storyteller.clone();
        let mut app = App::new(harness.session);
        app.choose_story(0);
        app.open(Screen::Report);

        app.request_insights();
        let request = app.pending_request.take().unwrap();
        assert_eq!(request, StorytellerRequest::Insights);
        app.fulfil_request(request).await;

        assert_eq!(app.generated.as_deref(), Some("Enjoys dragons."));
        assert!(storyteller.prompts()[0]
            .text()
            .contains("Story dragon choices: 1."));
    }

    #[tokio::test]
    async fn test_insights_failure_shows_message() {
        let harness = TestHarness::with_storyteller(
            MockStoryTeller::new().with_failure(CollaboratorError::Timeout),
        )
        .unwrap();
        let mut app = App::new(harness.session);
        app.open(Screen::Report);
        app.fulfil_request(StorytellerRequest::Insights).await;

        assert!(app.generated.is_none());
        assert!(app.status().unwrap().starts_with("Error generating AI insights"));
    }

    #[test]
    fn test_insights_need_storyteller() {
        let session = Session::with_parts(
            Arc::new(MetricsStore::in_memory()),
            content::forest_adventure().unwrap(),
            None,
        );
        let mut app = App::new(session);
        app.request_insights();
        assert!(app.pending_request.is_none());
        assert!(app.status().unwrap().contains("API key"));
    }
}
