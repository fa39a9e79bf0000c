use crate::drift::DriftSim;
use crate::model::{Scene, Theme};
use crate::quiz::QuizState;
use crate::view::ViewFrame;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub(crate) fn clear(&mut self, bg: Color, fg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = fg;
            c.bg = bg;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Palettes
------------------------------ */

#[derive(Clone, Copy)]
pub(crate) struct Palette {
    pub(crate) bg: Color,
    pub(crate) fg: Color,
    pub(crate) accent: Color,
    pub(crate) dim: Color,
    pub(crate) good: Color,
    pub(crate) bad: Color,
}

pub(crate) fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Yellow,
            dim: Color::DarkGrey,
            good: Color::Green,
            bad: Color::Red,
        },
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            accent: Color::Blue,
            dim: Color::Grey,
            good: Color::DarkGreen,
            bad: Color::DarkRed,
        },
    }
}

/* -----------------------------
   Drawing primitives
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

fn draw_box(buf: &mut CellBuffer, x: u16, y: u16, w: u16, h: u16, fg: Color, bg: Color) {
    if w < 2 || h < 2 {
        return;
    }
    for xx in x..x + w {
        buf.set(xx, y, Cell { ch: '─', fg, bg });
        buf.set(xx, y + h - 1, Cell { ch: '─', fg, bg });
    }
    for yy in y..y + h {
        buf.set(x, yy, Cell { ch: '│', fg, bg });
        buf.set(x + w - 1, yy, Cell { ch: '│', fg, bg });
    }
    buf.set(x, y, Cell { ch: '┌', fg, bg });
    buf.set(x + w - 1, y, Cell { ch: '┐', fg, bg });
    buf.set(x, y + h - 1, Cell { ch: '└', fg, bg });
    buf.set(x + w - 1, y + h - 1, Cell { ch: '┘', fg, bg });
    // blank the interior so cards cover whatever drifts underneath
    for yy in y + 1..y + h - 1 {
        for xx in x + 1..x + w - 1 {
            buf.set(xx, yy, Cell { ch: ' ', fg, bg });
        }
    }
}

fn truncated(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/* -----------------------------
   Layout
------------------------------ */

pub(crate) const HERO_W: u16 = 46;
pub(crate) const HERO_H: u16 = 9;
pub(crate) const CARD_W: u16 = 28;
pub(crate) const CARD_H: u16 = 6;
const HERO_X: u16 = 2;
const HERO_Y: u16 = 4;
const GRID_Y: u16 = HERO_Y + HERO_H + 2;

/// Rectangles for the hero card followed by the comparison cards, in the
/// same order `ViewFrame` lists them. Also seeds the drift toy.
pub(crate) fn card_rects(cols: u16, n_cards: usize) -> Vec<(f32, f32, f32, f32)> {
    let mut rects = vec![(HERO_X as f32, HERO_Y as f32, HERO_W as f32, HERO_H as f32)];
    let per_row = ((cols.saturating_sub(2)) / (CARD_W + 1)).max(1) as usize;
    for i in 0..n_cards {
        let col = i % per_row;
        let row = i / per_row;
        rects.push((
            (2 + col as u16 * (CARD_W + 1)) as f32,
            (GRID_Y + row as u16 * (CARD_H + 1)) as f32,
            CARD_W as f32,
            CARD_H as f32,
        ));
    }
    rects
}

/* -----------------------------
   Screen composition
------------------------------ */

/// Everything the compositor needs for one frame, by value or borrow; no
/// reach-back into app state.
pub(crate) struct Screen<'a> {
    pub(crate) scene: Scene,
    pub(crate) theme: Theme,
    pub(crate) date_edit: &'a str,
    pub(crate) status: Option<&'a str>,
    pub(crate) frame: Option<&'a ViewFrame>,
    pub(crate) quiz: Option<&'a QuizState>,
    pub(crate) quiz_feedback: Option<&'a str>,
    pub(crate) drift: Option<&'a DriftSim>,
    pub(crate) greeting: Option<&'a str>,
}

pub(crate) fn draw(buf: &mut CellBuffer, s: &Screen) {
    let p = palette(s.theme);
    buf.clear(p.bg, p.fg);

    draw_header(buf, s, &p);
    draw_input_line(buf, s, &p);

    if let Some(frame) = s.frame {
        let rects = card_rects(buf.w, frame.cards.len());
        let drifted: Option<Vec<(u16, u16)>> = s.drift.map(|sim| {
            sim.cards()
                .iter()
                .map(|c| (c.x.round().max(0.0) as u16, c.y.round().max(0.0) as u16))
                .collect()
        });
        let pos = |i: usize| -> (u16, u16) {
            if let Some(d) = &drifted {
                if let Some(&(x, y)) = d.get(i) {
                    return (x, y);
                }
            }
            (rects[i].0 as u16, rects[i].1 as u16)
        };

        let (hx, hy) = pos(0);
        draw_hero(buf, frame, hx, hy, &p);
        if s.drift.is_none() {
            let stats = format!(
                "{}  |  {}",
                frame.earth.exact_line, frame.earth.next_birthday_line
            );
            draw_text(buf, HERO_X, HERO_Y + HERO_H, &stats, p.accent, p.bg);
        }
        for (i, card) in frame.cards.iter().enumerate() {
            let (cx, cy) = pos(i + 1);
            draw_card(buf, card, cx, cy, &p);
        }
    } else {
        draw_text(
            buf,
            HERO_X,
            HERO_Y + 1,
            "Enter your birth date above to see your age across",
            p.dim,
            p.bg,
        );
        draw_text(
            buf,
            HERO_X,
            HERO_Y + 2,
            "the solar system.",
            p.dim,
            p.bg,
        );
    }

    draw_footer(buf, s, &p);

    match s.scene {
        Scene::Quiz => {
            if let Some(q) = s.quiz {
                draw_quiz(buf, q, s.quiz_feedback, &p);
            }
        }
        Scene::Help => draw_help(buf, &p),
        Scene::Main => {}
    }
}

fn draw_header(buf: &mut CellBuffer, s: &Screen, p: &Palette) {
    let avatar = s.frame.map(|f| f.avatar).unwrap_or("👨‍🚀");
    let title = format!("Planetage {avatar}  |  your age across the solar system");
    draw_text(buf, 1, 0, &title, p.accent, p.bg);
}

fn draw_input_line(buf: &mut CellBuffer, s: &Screen, p: &Palette) {
    let mut edit = s.date_edit.to_string();
    edit.push('_');
    let line = format!("Birth date (YYYY-MM-DD): {edit}");
    draw_text(buf, 1, 2, &line, p.fg, p.bg);

    if let Some(status) = s.status {
        draw_text(buf, 1, 3, status, p.bad, p.bg);
    }
}

fn draw_hero(buf: &mut CellBuffer, frame: &ViewFrame, x: u16, y: u16, p: &Palette) {
    draw_box(buf, x, y, HERO_W, HERO_H, p.accent, p.bg);
    let hero = &frame.hero;
    draw_text(
        buf,
        x + 2,
        y + 1,
        &format!("{} {} Age", hero.icon, hero.name),
        p.accent,
        p.bg,
    );
    draw_text(buf, x + 2, y + 2, &hero.age_line, p.fg, p.bg);
    draw_text(buf, x + 2, y + 3, &hero.sub_line, p.dim, p.bg);
    draw_text(buf, x + 2, y + 4, &hero.gravity_line, p.dim, p.bg);
    draw_text(buf, x + 2, y + 5, &hero.badge, p.good, p.bg);
    draw_text(
        buf,
        x + 2,
        y + 6,
        &format!("🎂 Next birthday: {}", hero.birthday_line),
        p.fg,
        p.bg,
    );
    draw_text(
        buf,
        x + 2,
        y + 7,
        &truncated(hero.fact, (HERO_W - 4) as usize),
        p.dim,
        p.bg,
    );
}

fn draw_card(buf: &mut CellBuffer, card: &crate::view::CardView, x: u16, y: u16, p: &Palette) {
    draw_box(buf, x, y, CARD_W, CARD_H, p.dim, p.bg);
    draw_text(
        buf,
        x + 2,
        y + 1,
        &format!("{} {}", card.icon, card.name),
        p.fg,
        p.bg,
    );
    draw_text(buf, x + 2, y + 2, &card.age_line, p.accent, p.bg);
    draw_text(
        buf,
        x + 2,
        y + 3,
        &format!("🎂 Next: {}", card.birthday_line),
        p.fg,
        p.bg,
    );
    draw_text(
        buf,
        x + 2,
        y + 4,
        &truncated(card.fact, (CARD_W - 4) as usize),
        p.dim,
        p.bg,
    );
}

fn draw_footer(buf: &mut CellBuffer, s: &Screen, p: &Palette) {
    let keys = match s.scene {
        Scene::Main => {
            "Keys: enter calc | ←/→ planet | r reset | t theme | g antigravity | x quiz | h help | q quit"
        }
        Scene::Quiz => "Quiz: 1-4 answer | enter next | esc close | q quit",
        Scene::Help => "Help: esc close | q quit",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), keys, p.dim, p.bg);

    if let Some(msg) = s.greeting {
        let y = buf.h.saturating_sub(2);
        draw_text(buf, 1, y, &truncated(msg, buf.w.saturating_sub(2) as usize), p.good, p.bg);
    }
}

fn center_box(buf: &mut CellBuffer, w: u16, h: u16, p: &Palette) -> (u16, u16) {
    let bw = w.min(buf.w.saturating_sub(4));
    let bh = h.min(buf.h.saturating_sub(4));
    let x0 = (buf.w - bw) / 2;
    let y0 = (buf.h - bh) / 2;
    draw_box(buf, x0, y0, bw, bh, p.accent, p.bg);
    (x0, y0)
}

fn draw_quiz(buf: &mut CellBuffer, quiz: &QuizState, feedback: Option<&str>, p: &Palette) {
    let (x0, y0) = center_box(buf, 56, 14, p);

    draw_text(
        buf,
        x0 + 2,
        y0 + 1,
        &format!("Planet Quiz 🚀  score: {}", quiz.score),
        p.accent,
        p.bg,
    );

    match quiz.question() {
        Some(q) => {
            draw_text(buf, x0 + 2, y0 + 3, q.prompt, p.fg, p.bg);
            for (i, opt) in q.options.iter().enumerate() {
                let y = y0 + 5 + i as u16;
                let marker = format!("{}) {}", i + 1, opt);
                let color = match quiz.answered {
                    Some(_) if i == q.correct => p.good,
                    Some(a) if i == a => p.bad,
                    Some(_) => p.dim,
                    None => p.fg,
                };
                draw_text(buf, x0 + 4, y, &marker, color, p.bg);
            }
            if let Some(fb) = feedback {
                draw_text(buf, x0 + 2, y0 + 10, fb, p.accent, p.bg);
            }
            if quiz.answered.is_some() {
                draw_text(buf, x0 + 2, y0 + 12, "Enter: next question", p.dim, p.bg);
            }
        }
        None => {
            let total = crate::quiz::QUESTIONS.len();
            draw_text(
                buf,
                x0 + 2,
                y0 + 4,
                "🎉 Quiz completed!",
                p.good,
                p.bg,
            );
            draw_text(
                buf,
                x0 + 2,
                y0 + 6,
                &format!("Final score: {}/{}", quiz.score, total),
                p.fg,
                p.bg,
            );
            draw_text(buf, x0 + 2, y0 + 8, "Enter: play again | Esc: close", p.dim, p.bg);
        }
    }
}

fn draw_help(buf: &mut CellBuffer, p: &Palette) {
    let (x0, y0) = center_box(buf, 58, 16, p);
    draw_text(buf, x0 + 2, y0 + 1, "How it works", p.accent, p.bg);

    let body = [
        "Type your birth date and press Enter. Your age is",
        "computed once in Earth-years (365.25 days each) and",
        "divided by every planet's orbital period.",
        "",
        "←/→ moves another planet into the big card without",
        "recomputing anything.",
        "",
        "r resets, t flips the theme, x opens the quiz and",
        "g lets the cards float away. Your date and theme are",
        "remembered for next time.",
    ];
    for (i, line) in body.iter().enumerate() {
        draw_text(buf, x0 + 2, y0 + 3 + i as u16, line, p.fg, p.bg);
    }
}
