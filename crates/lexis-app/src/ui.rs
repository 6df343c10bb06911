use std::io::{self, Write};

use kanal::AsyncReceiver;
use lexis_config::ui::UiConfig;
use lexis_core::ViewState;
use lexis_types::{AppEvent, Notice, NoticeLevel};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub const HELP: &str = "\
Type a word to look it up.
  :list            show saved words
  :show <n|word>   show a saved word
  :rm <n|word>     delete a saved word
  :refresh         reload the word list
  :help            this text
  :quit            exit";

/// Writes view changes as a terminal transcript.
///
/// Streamed text is printed as it grows; any other change of the shown word
/// starts a new block.
pub struct Renderer<W: Write> {
    out: W,
    last: ViewState,
    /// Cursor is not at the start of a line
    line_open: bool,
    print_list_on_refresh: bool,
    prompt: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, config: &UiConfig, interactive: bool) -> Self {
        Self {
            out,
            last: ViewState::default(),
            line_open: false,
            print_list_on_refresh: config.print_list_on_refresh,
            prompt: config.show_prompt && interactive,
        }
    }

    pub fn render(&mut self, next: &ViewState) -> io::Result<()> {
        let text = &next.selection.current_text;
        let (rewritten, last_len) = {
            let last_text = &self.last.selection.current_text;
            (!text.starts_with(last_text.as_str()), last_text.len())
        };

        let new_session = next.session.is_some() && next.session != self.last.session;
        let switched = next.selection.active_word() != self.last.selection.active_word();

        if new_session || switched || rewritten {
            self.end_line()?;
            if let Some(word) = next.selection.active_word() {
                writeln!(self.out, "== {word} ==")?;
            }
            write!(self.out, "{text}")?;
            self.line_open = !text.is_empty();
        } else if text.len() > last_len {
            write!(self.out, "{}", &text[last_len..])?;
            self.line_open = true;
        }

        let finished = !next.loading && (self.last.loading || new_session || switched);

        let listed = next.words != self.last.words && self.print_list_on_refresh;
        if listed {
            self.write_list(next)?;
        }

        if finished || (listed && !next.loading) {
            self.end_line()?;
            self.write_prompt()?;
        }

        self.last = next.clone();
        self.out.flush()
    }

    pub fn notice(&mut self, notice: &Notice) -> io::Result<()> {
        self.end_line()?;
        let level = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        writeln!(self.out, "[{level}] {}: {}", notice.title, notice.message)?;
        self.out.flush()
    }

    pub fn list(&mut self, view: &ViewState) -> io::Result<()> {
        self.write_list(view)?;
        self.write_prompt()?;
        self.out.flush()
    }

    pub fn help(&mut self) -> io::Result<()> {
        self.end_line()?;
        writeln!(self.out, "{HELP}")?;
        self.write_prompt()?;
        self.out.flush()
    }

    fn write_list(&mut self, view: &ViewState) -> io::Result<()> {
        self.end_line()?;
        if view.words.is_empty() {
            return writeln!(self.out, "(no saved words)");
        }
        for (i, entry) in view.words.iter().enumerate() {
            let marker = if view.selection.is_active(entry) { '*' } else { ' ' };
            writeln!(self.out, "{marker}{:>3}. {}", i + 1, entry.word)?;
        }
        Ok(())
    }

    fn end_line(&mut self) -> io::Result<()> {
        if self.line_open {
            writeln!(self.out)?;
            self.line_open = false;
        }
        Ok(())
    }

    fn write_prompt(&mut self) -> io::Result<()> {
        if self.prompt {
            write!(self.out, "> ")?;
        }
        Ok(())
    }
}

/// Render view changes, notices and list/help requests until cancelled
pub async fn ui_loop(
    mut view: watch::Receiver<ViewState>,
    notices: AsyncReceiver<Notice>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    config: UiConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);
    let mut renderer = Renderer::new(io::stdout(), &config, interactive);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                // Last state written before a quit
                while let Ok(Some(notice)) = notices.try_recv() {
                    renderer.notice(&notice)?;
                }
                if view.has_changed().unwrap_or(false) {
                    let last = view.borrow_and_update().clone();
                    renderer.render(&last)?;
                }
                break;
            }
            changed = view.changed() => {
                if changed.is_err() {
                    tracing::warn!("View state closed");
                    break;
                }
                let next = view.borrow_and_update().clone();
                renderer.render(&next)?;
            }
            notice = notices.recv() => {
                renderer.notice(&notice?)?;
            }
            event = app_to_ui_rx.recv() => match event? {
                AppEvent::ShowList => {
                    let current = view.borrow().clone();
                    renderer.list(&current)?;
                }
                AppEvent::Help => renderer.help()?,
                other => tracing::debug!("UI ignores {:?}", other),
            },
        }
    }

    tracing::info!("UI loop stopping");
    Ok(())
}
