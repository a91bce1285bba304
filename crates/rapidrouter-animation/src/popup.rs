//! Popup composition
//!
//! Turns a popup event plus the level's outcome flags into a structured
//! `Modal`. How a modal looks (HTML, egui, a terminal) is up to the
//! `Presenter`; this module only decides what goes in it.

use rapidrouter_common::LevelFlags;
pub use rapidrouter_common::EditorTab;

use crate::event::{Coins, Performance, Popup, PopupKind, WinScore};

pub const WIN_TITLE: &str = "You win!";
pub const FAIL_TITLE: &str = "Oh dear!";
pub const ROUTE_SCORE: &str = "Route score: ";
pub const ALGORITHM_SCORE: &str = "Algorithm score: ";
pub const NOW_TRY_PYTHON: &str =
    "Looks like you've got a route sorted using Blockly. Now try to do the same thing in Python!";
pub const LAST_LEVEL: &str =
    "Congratulations, you've completed the last level! Why not create your own map?";
pub const ANOTHER_RANDOM_LEVEL: &str = "Why not try another random level?";
pub const NEED_HINT: &str = "Are you stuck? Need a hint?";

pub fn total_score(total: f32, max: f32) -> String {
    format!("Your total score: {}/{}", total, max)
}

pub fn next_episode(episode: u32, random: bool) -> String {
    if random {
        format!(
            "Well done, you've completed this episode! Try episode {} or a random level.",
            episode
        )
    } else {
        format!("Well done, you've completed this episode! Ready for episode {}?", episode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalLine {
    Score {
        label: &'static str,
        coins: Coins,
        score: f32,
        max: f32,
    },
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalButton {
    TryAgain,
    Close,
    NextLevel { level: u32 },
    NextEpisode { episode: u32, random: bool },
    /// Go build a custom map
    LevelEditor,
    Home,
    /// Generate another random level
    PlayAgain,
    Hint,
}

impl ModalButton {
    pub fn label(&self) -> &'static str {
        match self {
            ModalButton::TryAgain => "Try again",
            ModalButton::Close => "Close",
            ModalButton::NextLevel { .. } => "Next Level",
            ModalButton::NextEpisode { .. } => "Next Episode",
            ModalButton::LevelEditor => "Create your own map!",
            ModalButton::Home => "Home",
            ModalButton::PlayAgain => "Have more fun!",
            ModalButton::Hint => NEED_HINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub title: String,
    pub body: Vec<ModalLine>,
    /// Hidden hint text, revealed by the hint button
    pub extra: Option<String>,
    pub dismissible: bool,
    pub buttons: Vec<ModalButton>,
}

/// Builds modals for popup events
#[derive(Debug, Clone, Default)]
pub struct PopupComposer {
    flags: LevelFlags,
}

impl PopupComposer {
    pub fn new(flags: LevelFlags) -> Self {
        Self { flags }
    }

    /// Follow the player switching editor tabs
    pub fn set_tab(&mut self, tab: EditorTab) {
        self.flags.tab = tab;
    }

    pub fn flags(&self) -> &LevelFlags {
        &self.flags
    }

    pub fn compose(&self, popup: &Popup) -> Modal {
        let mut modal = match popup.kind {
            PopupKind::Win => self.compose_win(popup),
            PopupKind::Fail => Modal {
                title: FAIL_TITLE.to_string(),
                body: vec![ModalLine::Text(popup.message.clone())],
                extra: None,
                dismissible: true,
                buttons: vec![ModalButton::TryAgain],
            },
            PopupKind::Warning => Modal {
                title: String::new(),
                body: vec![ModalLine::Text(popup.message.clone())],
                extra: None,
                dismissible: true,
                buttons: vec![ModalButton::TryAgain],
            },
        };

        if popup.hint {
            modal.buttons.push(ModalButton::Hint);
            modal.extra = Some(self.flags.hint.clone());
        }
        modal
    }

    fn compose_win(&self, popup: &Popup) -> Modal {
        let mut body = Vec::new();
        let mut buttons = Vec::new();

        if let Some(score) = &popup.score {
            body.extend(score_lines(score));
        }
        body.push(ModalLine::Text(popup.message.clone()));

        let perfect = popup
            .score
            .as_ref()
            .map_or(false, |s| s.performance == Performance::ScorePerfect);
        if !perfect {
            buttons.push(ModalButton::TryAgain);
        }

        let flags = &self.flags;
        if flags.blockly_enabled && flags.python_enabled && flags.tab == EditorTab::Blockly {
            body.push(ModalLine::Text(NOW_TRY_PYTHON.to_string()));
            buttons.push(ModalButton::Close);
        } else if let Some(level) = flags.next_level {
            buttons.push(ModalButton::NextLevel { level });
        } else if let Some(episode) = flags.next_episode {
            body.push(ModalLine::Text(next_episode(episode, flags.random_level)));
            buttons.push(ModalButton::NextEpisode {
                episode,
                random: flags.random_level,
            });
        } else if flags.default_level {
            body.push(ModalLine::Text(LAST_LEVEL.to_string()));
            buttons.push(ModalButton::LevelEditor);
            buttons.push(ModalButton::Home);
        } else if flags.random_level {
            body.push(ModalLine::Text(ANOTHER_RANDOM_LEVEL.to_string()));
            buttons.push(ModalButton::PlayAgain);
            buttons.push(ModalButton::Home);
        }

        Modal {
            title: WIN_TITLE.to_string(),
            body,
            extra: None,
            dismissible: true,
            buttons,
        }
    }
}

fn score_lines(score: &WinScore) -> Vec<ModalLine> {
    let mut lines = Vec::with_capacity(3);
    if !score.path_score_disabled {
        lines.push(ModalLine::Score {
            label: ROUTE_SCORE,
            coins: score.route_coins,
            score: score.path_length_score,
            max: score.max_score_for_path_length,
        });
    }
    if score.max_score_for_number_of_instructions != 0.0 {
        lines.push(ModalLine::Score {
            label: ALGORITHM_SCORE,
            coins: score.instr_coins,
            score: score.instr_score,
            max: score.max_score_for_number_of_instructions,
        });
    }
    lines.push(ModalLine::Text(total_score(score.total_score, score.max_score)));
    lines
}
