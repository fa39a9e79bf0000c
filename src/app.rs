use crate::config::{prefs_path, FilePrefs, Preferences, KEY_DOB, KEY_THEME};
use crate::drift::DriftSim;
use crate::engine::{AgeError, Clock, SystemClock};
use crate::greeting;
use crate::input::{collect_input_nonblocking, map_key_to_action, UiAction};
use crate::model::{Scene, Theme};
use crate::quiz::QuizState;
use crate::render::{self, card_rects, Screen, Terminal};
use crate::view::Coordinator;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

const FPS_CAP: u32 = 30;
const DATE_LEN_MAX: usize = 10; // YYYY-MM-DD

pub(crate) struct App {
    prefs: FilePrefs,
    clock: SystemClock,
    coordinator: Coordinator,
    theme: Theme,
    scene: Scene,
    quiz: QuizState,
    quiz_feedback: Option<&'static str>,
    drift: Option<DriftSim>,
    term: Terminal,
    date_edit: String,
    status: Option<String>,
    greeting_rx: Option<Receiver<String>>,
    greeting: Option<String>,
    should_quit: bool,
}

impl App {
    fn init() -> Result<Self> {
        let path = prefs_path()?;
        let prefs = FilePrefs::open(path);

        let theme = prefs
            .get(KEY_THEME)
            .and_then(|s| Theme::parse(&s))
            .unwrap_or(Theme::Dark);

        let clock = SystemClock;
        let mut coordinator = Coordinator::new();
        let mut date_edit = String::new();
        let mut status = None;

        // a persisted date auto-advances straight to the calculated state
        if let Some(saved) = prefs.get(KEY_DOB) {
            if let Ok(dob) = NaiveDate::parse_from_str(&saved, "%Y-%m-%d") {
                date_edit = saved;
                coordinator.load_dob(dob);
                if let Err(e) = coordinator.recalculate(&clock) {
                    status = Some(reject_message(e).to_string());
                }
            }
        }

        let greeting_rx = Some(greeting::spawn_fetch(greeting::greeting_url()));
        let term = Terminal::begin()?;

        Ok(Self {
            prefs,
            clock,
            coordinator,
            theme,
            scene: Scene::Main,
            quiz: QuizState::new(),
            quiz_feedback: None,
            drift: None,
            term,
            date_edit,
            status,
            greeting_rx,
            greeting: None,
            should_quit: false,
        })
    }

    fn run(&mut self) -> Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / FPS_CAP as f32);

        while !self.should_quit {
            self.term.resize_if_needed()?;
            self.poll_greeting();

            for key in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_key_to_action(self.scene, key) {
                    self.apply(action)?;
                    if self.should_quit {
                        break;
                    }
                }
            }

            // the bounce toy advances one step per frame while enabled
            if let Some(sim) = &mut self.drift {
                sim.step(self.term.cols as f32, self.term.rows as f32);
            }

            self.render_frame()?;
            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        self.prefs.flush()?;
        Ok(())
    }

    fn apply(&mut self, action: UiAction) -> Result<()> {
        match action {
            UiAction::DateChar(c) => {
                if self.date_edit.len() < DATE_LEN_MAX {
                    self.date_edit.push(c);
                }
                self.status = None;
            }
            UiAction::DateBackspace => {
                self.date_edit.pop();
                self.status = None;
            }
            UiAction::Calculate => self.calculate()?,
            UiAction::Reset => {
                self.coordinator.reset();
                self.date_edit.clear();
                self.status = None;
                self.drift = None;
                self.persist()?;
            }
            UiAction::ThemeToggle => {
                self.theme = self.theme.toggled();
                self.persist()?;
            }
            UiAction::DriftToggle => self.toggle_drift(),
            UiAction::SelectPrev => self.coordinator.select_adjacent(-1),
            UiAction::SelectNext => self.coordinator.select_adjacent(1),
            UiAction::QuizOpen => {
                self.quiz.restart();
                self.quiz_feedback = None;
                self.scene = Scene::Quiz;
            }
            UiAction::QuizAnswer(i) => {
                if let Some(correct) = self.quiz.answer(i) {
                    self.quiz_feedback = Some(if correct {
                        "✅ Correct! Great job!"
                    } else {
                        "❌ Oops! Nice try."
                    });
                }
            }
            UiAction::QuizNext => {
                if self.quiz.finished() {
                    self.quiz.restart();
                } else {
                    self.quiz.advance();
                }
                self.quiz_feedback = None;
            }
            UiAction::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            UiAction::Back => {
                self.scene = Scene::Main;
                self.status = None;
            }
            UiAction::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn calculate(&mut self) -> Result<()> {
        if self.date_edit.is_empty() {
            self.status = Some(reject_message(AgeError::MissingBirthDate).to_string());
            return Ok(());
        }
        let dob = match NaiveDate::parse_from_str(&self.date_edit, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                self.status = Some("Dates look like 1990-04-23".to_string());
                return Ok(());
            }
        };
        match self.coordinator.calculate(dob, &self.clock) {
            Ok(()) => {
                self.status = None;
                self.persist()?;
            }
            // prior displayed state is left exactly as it was
            Err(e) => self.status = Some(reject_message(e).to_string()),
        }
        Ok(())
    }

    fn toggle_drift(&mut self) {
        if self.drift.is_some() {
            // stopping discards the position list; layout snaps back
            self.drift = None;
            return;
        }
        let Some(frame) = self.coordinator.frame() else {
            return;
        };
        let rects = card_rects(self.term.cols, frame.cards.len());
        let seed = self.clock.now().timestamp_millis() as u64;
        self.drift = Some(DriftSim::start(&rects, seed));
    }

    /// Written after every successful submit, reset or theme toggle.
    fn persist(&mut self) -> Result<()> {
        match self.coordinator.dob() {
            Some(dob) => self.prefs.set(KEY_DOB, &dob.format("%Y-%m-%d").to_string()),
            None => self.prefs.remove(KEY_DOB),
        }
        self.prefs.set(KEY_THEME, self.theme.as_str());
        self.prefs.flush()
    }

    fn poll_greeting(&mut self) {
        if let Some(rx) = &self.greeting_rx {
            if let Ok(msg) = rx.try_recv() {
                self.greeting = Some(msg);
                self.greeting_rx = None;
            }
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        let frame = self.coordinator.frame();
        let screen = Screen {
            scene: self.scene,
            theme: self.theme,
            date_edit: &self.date_edit,
            status: self.status.as_deref(),
            frame: frame.as_ref(),
            quiz: Some(&self.quiz),
            quiz_feedback: self.quiz_feedback,
            drift: self.drift.as_ref(),
            greeting: self.greeting.as_deref(),
        };
        render::draw(&mut self.term.cur, &screen);
        self.term.present(true)?;
        Ok(())
    }
}

fn reject_message(e: AgeError) -> &'static str {
    match e {
        AgeError::MissingBirthDate => "Please pick a date first!",
        AgeError::FutureBirthDate => "Future babies not allowed! 👶",
    }
}

pub(crate) fn run() -> Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
