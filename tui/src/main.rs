//! Arbor Demo Host
//!
//! Runs a tree of simulated jobs inside a frame compositor, drawn in an
//! inline viewport below the shell prompt. The frame's imprint commands are
//! written into scroll-back above the viewport.
//!
//! Usage:
//!   arbor-demo [STYLE_TOML]
//!
//! Without a style file the tree style comes from `ARBOR_TREE_*`
//! environment variables. Press `q` or `Esc` to stop early. Logs go to
//! stderr and are filtered by `RUST_LOG`.

use std::collections::VecDeque;
use std::io;
use std::panic;
use std::time::{Duration, Instant};

use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::{Paragraph, Widget};
use ratatui::{Terminal, TerminalOptions, Viewport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arbor_tui::{Command, Element, Event, FrameCompositor, TextBlock, TreeCompositor, TreeStyle};

/// Rows reserved for the live region
const VIEWPORT_HEIGHT: u16 = 14;

/// Delay between ticks
const TICK_INTERVAL: Duration = Duration::from_millis(120);

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

type DemoTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Payload emitted once when a job completes
struct JobFinished;

/// A job that advances one step per tick
struct Job {
    title: String,
    detail: Option<String>,
    steps: u32,
    done: u32,
    frame: usize,
    hide_when_done: bool,
}

impl Job {
    fn new(title: &str, steps: u32) -> Self {
        Self {
            title: title.to_string(),
            detail: None,
            steps,
            done: 0,
            frame: 0,
            hide_when_done: false,
        }
    }

    fn detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    fn hide_when_done(mut self) -> Self {
        self.hide_when_done = true;
        self
    }

    fn finished(&self) -> bool {
        self.done >= self.steps
    }
}

impl Element for Job {
    fn view(&self) -> String {
        if self.finished() {
            return format!("✔ {}", self.title);
        }
        let spinner = SPINNER[self.frame % SPINNER.len()];
        let mut out = format!("{spinner} {} [{}/{}]", self.title, self.done, self.steps);
        if let Some(detail) = &self.detail {
            out.push('\n');
            out.push_str(detail);
        }
        out
    }

    fn update(mut self: Box<Self>, event: Option<&Event>) -> (Box<dyn Element>, Option<Command>) {
        if !matches!(event, Some(Event::Tick(_))) || self.finished() {
            return (self, None);
        }

        self.frame += 1;
        self.done += 1;

        if self.finished() {
            tracing::debug!(job = %self.title, "Job finished");
            return (self, Some(Command::Emit(Event::custom(JobFinished))));
        }
        (self, None)
    }

    fn is_visible(&self) -> bool {
        !(self.hide_when_done && self.finished())
    }
}

/// A line that is imprinted into scroll-back on the first cycle
struct Notice(String);

impl Element for Notice {
    fn view(&self) -> String {
        self.0.clone()
    }

    fn update(self: Box<Self>, _event: Option<&Event>) -> (Box<dyn Element>, Option<Command>) {
        (self, None)
    }

    fn should_imprint(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("arbor-demo requires a terminal (TTY)");
        std::process::exit(1);
    }

    let style = match std::env::args().nth(1) {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path).await?;
            TreeStyle::from_toml_str(&raw)?
        }
        None => TreeStyle::from_env()?,
    };

    let (tree, jobs) = build_tree(style)?;
    let mut frame = FrameCompositor::new();
    frame.push(Notice(format!("arbor demo: {jobs} jobs")));
    frame.push(tree);

    // Restore the terminal before the panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(VIEWPORT_HEIGHT),
        },
    )?;

    let result = run(&mut terminal, frame, jobs).await;

    terminal.clear()?;
    disable_raw_mode()?;
    terminal.show_cursor()?;

    result
}

/// Three groups of jobs; returns the tree and the number of jobs in it
fn build_tree(style: TreeStyle) -> anyhow::Result<(TreeCompositor, usize)> {
    let tree = TreeCompositor::with_style(style);

    tree.add("", "build", TextBlock::new("build"))?;
    tree.add("build", "compile", Job::new("compile crates", 18))?;
    tree.add("build", "link", Job::new("link binaries", 9))?;

    tree.add("", "test", TextBlock::new("test"))?;
    tree.add("test", "unit", Job::new("unit tests", 25))?;
    tree.add("test", "flaky", Job::new("retry flaky tests", 12).hide_when_done())?;
    tree.add(
        "test",
        "integration",
        Job::new("integration tests", 34).detail("spinning up fixtures"),
    )?;

    tree.add("", "publish", TextBlock::new("publish"))?;
    tree.add("publish", "package", Job::new("package artifacts", 40))?;

    let jobs = tree.len() - tree.roots().len();
    Ok((tree, jobs))
}

async fn run(terminal: &mut DemoTerminal, mut frame: FrameCompositor, jobs: usize) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    let mut input = EventStream::new();
    let mut pending: VecDeque<Event> = VecDeque::new();
    let mut finished = 0;
    let mut running = true;

    let (width, height) = crossterm::terminal::size()?;
    pending.push_back(Event::Resize { width, height });

    while running {
        while let Some(event) = pending.pop_front() {
            if let Event::Key(key) = &event {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    running = false;
                }
            }
            if event.downcast_ref::<JobFinished>().is_some() {
                finished += 1;
            }

            for command in frame.update(Some(&event)) {
                match command {
                    Command::Print(text) => print_above(terminal, &text)?,
                    Command::Emit(next) => pending.push_back(next),
                    Command::Quit => running = false,
                    // update() already flattens batches
                    Command::Batch(_) => {}
                }
            }
        }

        if finished >= jobs {
            running = false;
        }

        let view = frame.render();
        terminal.draw(|f| f.render_widget(Paragraph::new(view), f.area()))?;

        if !running {
            break;
        }

        let next = tokio::select! {
            _ = ticker.tick() => Some(Event::Tick(Instant::now())),
            Some(Ok(term)) = input.next() => translate(term),
        };
        if let Some(event) = next {
            pending.push_back(event);
        }
    }

    print_above(terminal, &frame.render())?;
    tracing::info!(finished, jobs, "Demo finished");
    Ok(())
}

fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

/// Write `text` into scroll-back above the inline viewport
fn print_above(terminal: &mut DemoTerminal, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let lines = u16::try_from(text.lines().count()).unwrap_or(u16::MAX);
    let owned = text.to_string();
    terminal.insert_before(lines, |buf| {
        Paragraph::new(owned).render(buf.area, buf);
    })
}
