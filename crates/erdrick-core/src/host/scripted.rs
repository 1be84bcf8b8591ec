//! Headless host driven by a line-oriented script.
//!
//! ```text
//! # new game, name the hero, walk two steps and open the command window
//! select 0
//! name ERDRICK
//! press down 2
//! idle 30
//! press a
//! select 2
//! ```
//!
//! Commands run in order. `press <button> [n]` holds a button for `n` polls,
//! `idle <n>` polls with nothing held, `select <n>` / `cancel` / `yes` / `no`
//! answer the next window and `name <text>` answers name entry. A window that
//! meets a button event instead consumes it: a held `a` picks the first entry
//! and anything else cancels. Once the script is used up (or the frame limit
//! is reached) the host reports itself powered off.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    dialog::{MessageSpeed, TextArgs, TextRef},
    error::ScriptError,
    host::{
        AudioDriver, Buttons, Host, Joypad, Music, Selection, Sfx, VideoSink, Window, WindowKind,
        WindowRenderer,
    },
    memory::ppu::SPRITE_RAM_SIZE,
    ppu::vram::Vram,
};

/// Frames a jingle keeps the audio driver busy.
pub const JINGLE_FRAMES: u16 = 30;

/// Default cap on emulated frames before the host switches itself off.
pub const DEFAULT_FRAME_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Hold { buttons: Buttons, polls: u32 },
    Answer(Selection),
    Name(String),
}

/// Something the engine asked the host to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Text {
        text: TextRef,
        number: Option<u32>,
        subject: Option<String>,
    },
    Window {
        kind: WindowKind,
        selection: Selection,
    },
    Name(Option<String>),
    Sfx(Sfx),
    Music(Music),
}

#[derive(Debug, Clone)]
pub struct ScriptedHost {
    steps: VecDeque<Step>,
    transcript: Vec<HostEvent>,
    vram: Vram,
    jingle_frames: u16,
    frame_limit: u64,
    frames: u64,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHost {
    /// A host with an empty script; it is powered off from the start.
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            transcript: Vec::new(),
            vram: Vram::new(),
            jingle_frames: 0,
            frame_limit: DEFAULT_FRAME_LIMIT,
            frames: 0,
        }
    }

    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut host = Self::new();
        host.append_script(script)?;
        Ok(host)
    }

    /// Parses `script` and queues it after whatever is already pending.
    pub fn append_script(&mut self, script: &str) -> Result<(), ScriptError> {
        for (index, raw) in script.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let mut words = content.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            let command = command.to_ascii_lowercase();
            let step = match command.as_str() {
                "press" => {
                    let name = words.next().ok_or_else(|| ScriptError::MissingArgument {
                        line,
                        command: command.clone(),
                    })?;
                    let buttons = name
                        .split('+')
                        .map(|part| {
                            Buttons::from_name(&part.to_ascii_uppercase()).ok_or_else(|| {
                                ScriptError::UnknownButton {
                                    line,
                                    button: part.to_string(),
                                }
                            })
                        })
                        .try_fold(Buttons::empty(), |acc, button| button.map(|b| acc | b))?;
                    let polls = parse_count(line, words.next(), 1)?;
                    Step::Hold { buttons, polls }
                }
                "idle" => {
                    let value = words.next().ok_or_else(|| ScriptError::MissingArgument {
                        line,
                        command: command.clone(),
                    })?;
                    let polls = parse_count(line, Some(value), 1)?;
                    Step::Hold {
                        buttons: Buttons::empty(),
                        polls,
                    }
                }
                "select" => {
                    let value = words.next().ok_or_else(|| ScriptError::MissingArgument {
                        line,
                        command: command.clone(),
                    })?;
                    let index = value.parse::<usize>().map_err(|_| ScriptError::InvalidCount {
                        line,
                        value: value.to_string(),
                    })?;
                    Step::Answer(Selection::Index(index))
                }
                "yes" => Step::Answer(Selection::Index(0)),
                "no" => Step::Answer(Selection::Index(1)),
                "cancel" => Step::Answer(Selection::Cancelled),
                "name" => {
                    let name = content[command.len()..].trim();
                    if name.is_empty() {
                        return Err(ScriptError::MissingArgument { line, command });
                    }
                    Step::Name(name.to_string())
                }
                _ => return Err(ScriptError::UnknownCommand { line, command }),
            };
            self.steps.push_back(step);
        }
        Ok(())
    }

    /// Queues a window answer directly.
    pub fn push_answer(&mut self, selection: Selection) {
        self.steps.push_back(Step::Answer(selection));
    }

    /// Queues a held button directly.
    pub fn push_buttons(&mut self, buttons: Buttons, polls: u32) {
        self.steps.push_back(Step::Hold { buttons, polls });
    }

    pub fn push_name(&mut self, name: impl Into<String>) {
        self.steps.push_back(Step::Name(name.into()));
    }

    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = limit;
        self
    }

    pub fn transcript(&self) -> &[HostEvent] {
        &self.transcript
    }

    /// Dialog lines shown so far, in order.
    pub fn texts(&self) -> Vec<TextRef> {
        self.transcript
            .iter()
            .filter_map(|event| match event {
                HostEvent::Text { text, .. } => Some(*text),
                _ => None,
            })
            .collect()
    }

    pub fn saw_text(&self, text: TextRef) -> bool {
        self.texts().contains(&text)
    }

    pub fn played_sfx(&self, sfx: Sfx) -> bool {
        self.transcript.contains(&HostEvent::Sfx(sfx))
    }

    pub fn played_music(&self, music: Music) -> bool {
        self.transcript.contains(&HostEvent::Music(music))
    }

    pub fn windows(&self) -> Vec<WindowKind> {
        self.transcript
            .iter()
            .filter_map(|event| match event {
                HostEvent::Window { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Steps left in the script.
    pub fn pending(&self) -> usize {
        self.steps.len()
    }

    fn consume_hold(&mut self) -> Option<Buttons> {
        let Some(Step::Hold { buttons, polls }) = self.steps.front_mut() else {
            return None;
        };
        let held = *buttons;
        *polls = polls.saturating_sub(1);
        if *polls == 0 {
            self.steps.pop_front();
        }
        Some(held)
    }
}

fn parse_count(line: usize, value: Option<&str>, default: u32) -> Result<u32, ScriptError> {
    match value {
        None => Ok(default),
        Some(text) => match text.parse::<u32>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(ScriptError::InvalidCount {
                line,
                value: text.to_string(),
            }),
        },
    }
}

impl VideoSink for ScriptedHost {
    fn write(&mut self, addr: u16, data: u8) {
        self.vram.write(addr, data);
    }

    fn set_scroll(&mut self, x: u8, y: u8) {
        self.vram.set_scroll(x, y);
    }

    fn upload_sprites(&mut self, sprites: &[u8; SPRITE_RAM_SIZE]) {
        self.vram.upload_sprites(sprites);
    }

    fn frame_complete(&mut self, frame: u64) {
        self.frames = frame;
        self.vram.frame_complete(frame);
        trace!(frame, "frame complete");
    }
}

impl AudioDriver for ScriptedHost {
    fn play_sfx(&mut self, sfx: Sfx) {
        self.transcript.push(HostEvent::Sfx(sfx));
    }

    fn play_music(&mut self, music: Music) {
        if music.is_jingle() {
            self.jingle_frames = JINGLE_FRAMES;
        }
        self.transcript.push(HostEvent::Music(music));
    }

    fn service(&mut self) {
        self.jingle_frames = self.jingle_frames.saturating_sub(1);
    }

    fn is_playing(&self) -> bool {
        self.jingle_frames > 0
    }
}

impl WindowRenderer for ScriptedHost {
    fn show_window(&mut self, window: Window<'_>) -> Selection {
        let selection = match self.steps.front() {
            Some(Step::Answer(selection)) => {
                let selection = *selection;
                self.steps.pop_front();
                selection
            }
            Some(Step::Hold { .. }) => match self.consume_hold() {
                Some(buttons) if buttons.contains(Buttons::A) => Selection::Index(0),
                _ => Selection::Cancelled,
            },
            Some(Step::Name(_)) => {
                self.steps.pop_front();
                Selection::Cancelled
            }
            None => Selection::Cancelled,
        };
        debug!(window = ?window.kind(), ?selection, "window");
        self.transcript.push(HostEvent::Window {
            kind: window.kind(),
            selection,
        });
        selection
    }

    fn show_text(&mut self, text: TextRef, args: &TextArgs<'_>, _speed: MessageSpeed) {
        debug!(%text, number = ?args.number, subject = ?args.subject, "text");
        self.transcript.push(HostEvent::Text {
            text,
            number: args.number,
            subject: args.subject.map(str::to_string),
        });
    }

    fn enter_name(&mut self) -> Option<String> {
        let name = match self.steps.front() {
            Some(Step::Name(name)) => {
                let name = name.clone();
                self.steps.pop_front();
                Some(name)
            }
            Some(Step::Hold { .. }) => {
                let _ = self.consume_hold();
                None
            }
            Some(Step::Answer(_)) => {
                self.steps.pop_front();
                None
            }
            None => None,
        };
        self.transcript.push(HostEvent::Name(name.clone()));
        name
    }
}

impl Joypad for ScriptedHost {
    fn poll(&mut self) -> Buttons {
        // Answers and names wait for their window; polls in between see nothing held.
        self.consume_hold().unwrap_or_default()
    }
}

impl Host for ScriptedHost {
    fn powered_off(&self) -> bool {
        self.steps.is_empty() || self.frames >= self.frame_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::text;

    #[test]
    fn parses_every_command() {
        let host = ScriptedHost::from_script(
            "# comment\nselect 1\ncancel\nyes\nno\nname Loto the Brave\npress up+a 3\nidle 5\n",
        )
        .expect("script parses");
        assert_eq!(host.pending(), 7);
    }

    #[test]
    fn reports_line_numbers() {
        let err = ScriptedHost::from_script("press a\n\njump 3").expect_err("unknown command");
        assert_eq!(
            err,
            ScriptError::UnknownCommand {
                line: 3,
                command: "jump".into()
            }
        );
        let err = ScriptedHost::from_script("press turbo").expect_err("unknown button");
        assert!(matches!(err, ScriptError::UnknownButton { line: 1, .. }));
        let err = ScriptedHost::from_script("idle 0").expect_err("zero count");
        assert!(matches!(err, ScriptError::InvalidCount { line: 1, .. }));
        let err = ScriptedHost::from_script("select").expect_err("missing argument");
        assert!(matches!(err, ScriptError::MissingArgument { line: 1, .. }));
    }

    #[test]
    fn holds_count_down_then_power_off() {
        let mut host = ScriptedHost::from_script("press right 2").expect("script parses");
        assert!(!host.powered_off());
        assert_eq!(host.poll(), Buttons::RIGHT);
        assert_eq!(host.poll(), Buttons::RIGHT);
        assert_eq!(host.poll(), Buttons::empty());
        assert!(host.powered_off());
    }

    #[test]
    fn button_names_ignore_case() {
        let mut host = ScriptedHost::from_script("press down+A\npress Start").expect("parses");
        assert_eq!(host.poll(), Buttons::DOWN | Buttons::A);
        assert_eq!(host.poll(), Buttons::START);
    }

    #[test]
    fn windows_consume_answers_and_buttons() {
        let mut host = ScriptedHost::from_script("select 2\npress a\npress b").expect("parses");
        assert_eq!(host.show_window(Window::Command), Selection::Index(2));
        assert_eq!(host.show_window(Window::Command), Selection::Index(0));
        assert_eq!(host.show_window(Window::Confirm), Selection::Cancelled);
        assert_eq!(host.show_window(Window::Confirm), Selection::Cancelled);
        assert_eq!(
            host.windows(),
            vec![
                WindowKind::Command,
                WindowKind::Command,
                WindowKind::Confirm,
                WindowKind::Confirm
            ]
        );
    }

    #[test]
    fn polls_do_not_eat_answers() {
        let mut host = ScriptedHost::from_script("yes").expect("parses");
        assert_eq!(host.poll(), Buttons::empty());
        assert_eq!(host.show_window(Window::Confirm), Selection::Index(0));
    }

    #[test]
    fn jingles_keep_the_driver_busy() {
        let mut host = ScriptedHost::new();
        host.play_music(Music::Overworld);
        assert!(!host.is_playing());
        host.play_music(Music::Victory);
        for _ in 0..JINGLE_FRAMES {
            assert!(host.is_playing());
            host.service();
        }
        assert!(!host.is_playing());
    }

    #[test]
    fn transcript_records_text() {
        let mut host = ScriptedHost::new();
        host.show_text(
            text::FOUND_GOLD,
            &TextArgs::named("HERO").number(120u16),
            MessageSpeed::Fast,
        );
        assert!(host.saw_text(text::FOUND_GOLD));
        assert_eq!(
            host.transcript()[0],
            HostEvent::Text {
                text: text::FOUND_GOLD,
                number: Some(120),
                subject: None
            }
        );
    }

    #[test]
    fn frame_limit_powers_off() {
        let mut host = ScriptedHost::from_script("idle 100")
            .expect("parses")
            .with_frame_limit(3);
        host.frame_complete(3);
        assert!(host.powered_off());
    }
}
