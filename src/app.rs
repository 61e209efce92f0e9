use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::client::AnswerClient;
use crate::config::Config;
use crate::error::ChatError;
use crate::state::{ChatMessage, APOLOGY, GREETING, SUGGESTIONS};
use crate::tui::{AppEvent, EventSender};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,

    // Session state
    pub messages: Vec<ChatMessage>,
    pub draft_input: String,
    pub cursor: usize, // cursor position in draft_input, in chars
    pub is_loading: bool,
    pub last_error: Option<String>,

    // Chat view state
    pub scroll: u16,
    pub follow_tail: bool, // keep the newest message in view
    pub chat_height: u16,  // Height of chat area for scroll calculations
    pub thread_rows: u16,  // Wrapped height of the thread, measured during render

    // Animation state
    pub animation_frame: u8, // 0-2, which typing dot is lit

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub send_area: Option<Rect>,
    pub suggestion_areas: Vec<Rect>,

    pub client: AnswerClient,
    events: EventSender,
}

impl App {
    pub fn new(config: &Config, events: EventSender) -> Self {
        Self::with_client(AnswerClient::new(&config.api_url), events)
    }

    pub fn with_client(client: AnswerClient, events: EventSender) -> Self {
        Self {
            should_quit: false,

            messages: vec![ChatMessage::assistant(GREETING)],
            draft_input: String::new(),
            cursor: 0,
            is_loading: false,
            last_error: None,

            scroll: 0,
            follow_tail: true,
            chat_height: 0,
            thread_rows: 0,

            animation_frame: 0,

            chat_area: None,
            send_area: None,
            suggestion_areas: Vec::new(),

            client,
            events,
        }
    }

    /// True when Enter would actually send something.
    pub fn can_send(&self) -> bool {
        !self.is_loading && !self.draft_input.trim().is_empty()
    }

    /// Send `text` to the answer service.
    ///
    /// Blank text and submits during an in-flight request are rejected without
    /// touching any state. Otherwise the user message is appended right away and
    /// the outcome arrives later as `AppEvent::Answer`.
    pub fn submit(&mut self, text: &str) -> Result<(), ChatError> {
        let question = text.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if self.is_loading {
            return Err(ChatError::Busy);
        }

        let question = question.to_string();
        self.messages.push(ChatMessage::user(question.clone()));
        self.draft_input.clear();
        self.cursor = 0;
        self.is_loading = true;
        self.last_error = None;
        self.follow_tail = true;
        self.scroll_to_bottom();

        info!(endpoint = self.client.endpoint(), chars = question.chars().count(), "sending question");

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = client.ask(&question).await;
            // Receiver gone means the app is shutting down
            let _ = events.send(AppEvent::Answer(outcome));
        });

        Ok(())
    }

    pub fn submit_draft(&mut self) {
        let draft = self.draft_input.clone();
        if let Err(err) = self.submit(&draft) {
            debug!(%err, "submit ignored");
        }
    }

    /// Apply the outcome of the request started by `submit`.
    pub fn finish_submit(&mut self, outcome: Result<String, ChatError>) {
        match outcome {
            Ok(answer) => {
                info!(chars = answer.chars().count(), "answer received");
                self.messages.push(ChatMessage::assistant(answer));
            }
            Err(err) => {
                warn!(error = %err, status = ?err.status(), "request failed");
                self.last_error = Some(err.to_string());
                self.messages.push(ChatMessage::assistant(APOLOGY));
            }
        }
        self.is_loading = false;
        self.animation_frame = 0;
        self.scroll_to_bottom();
    }

    /// Put a canned question into the input box without sending it.
    pub fn pick_suggestion(&mut self, idx: usize) -> bool {
        let Some(suggestion) = SUGGESTIONS.get(idx) else {
            return false;
        };
        self.draft_input = (*suggestion).to_string();
        self.cursor = self.draft_input.chars().count();
        true
    }

    /// Start over with just the greeting. Not allowed mid-request.
    pub fn clear_conversation(&mut self) {
        if self.is_loading {
            return;
        }
        self.messages = vec![ChatMessage::assistant(GREETING)];
        self.last_error = None;
        self.scroll = 0;
        self.follow_tail = true;
    }

    // Draft editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.draft_input, self.cursor);
        self.draft_input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.draft_input, self.cursor);
            self.draft_input.remove(byte_pos);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor < self.draft_input.chars().count() {
            let byte_pos = char_to_byte_index(&self.draft_input, self.cursor);
            self.draft_input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.draft_input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.draft_input.chars().count();
    }

    // Scrolling

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.thread_rows.saturating_sub(visible_height)
    }

    /// Scroll chat to bottom so the newest message (or the typing indicator) is visible
    pub fn scroll_to_bottom(&mut self) {
        if self.follow_tail {
            self.scroll = self.max_scroll();
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_tail = self.scroll >= self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.scroll = self.scroll.saturating_add(lines).min(max);
        self.follow_tail = self.scroll >= max;
    }
}
