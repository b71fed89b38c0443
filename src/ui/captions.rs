// SPDX-License-Identifier: MPL-2.0
//! Caption workflow: tone selection, generation and caption choice.
//!
//! Generation is split in two halves. [`State::update`] with
//! [`Message::Generate`] enters the loading state and hands back a
//! [`PendingGeneration`]; the host runs it with [`run_generation`] and feeds
//! the resulting [`Message::Generated`] back in. Every accepted `Generate`
//! gets a fresh [`RequestTicket`], and only the response carrying the current
//! ticket is applied.

use crate::application::port::caption::{CaptionClient, CaptionError, CaptionRequest};
use crate::domain::caption::{CaptionSet, Tone};
use crate::media::{data_url, StoredImage};
use std::time::Duration;

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

/// A request the host must run and answer with [`Message::Generated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGeneration {
    pub ticket: RequestTicket,
    pub request: CaptionRequest,
}

/// State of the caption workflow.
#[derive(Debug, Clone, Default)]
pub struct State {
    tone: Tone,
    captions: CaptionSet,
    is_loading: bool,
    is_slow: bool,
    error: Option<String>,
    pending: Option<RequestTicket>,
    last_ticket: u64,
}

/// Messages handled by the caption workflow.
#[derive(Debug, Clone)]
pub enum Message {
    SelectTone(Tone),
    Generate,
    Generated {
        ticket: RequestTicket,
        result: Result<Vec<String>, CaptionError>,
    },
    /// The slow-response delay elapsed for `ticket`.
    SlowNotice {
        ticket: RequestTicket,
    },
    SelectCaption(usize),
    Proceed,
}

/// Events propagated to the step controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    GenerationRequested(PendingGeneration),
    CaptionChosen(String),
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone
    }

    #[must_use]
    pub fn captions(&self) -> &CaptionSet {
        &self.captions
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the current request has been pending longer than expected.
    #[must_use]
    pub fn is_slow(&self) -> bool {
        self.is_slow
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn pending_ticket(&self) -> Option<RequestTicket> {
        self.pending
    }

    /// Update the state and emit an [`Event`] for the parent when needed.
    ///
    /// `image` is the image to caption; `Generate` is ignored without one.
    pub fn update(&mut self, message: Message, image: Option<&StoredImage>) -> Event {
        match message {
            Message::SelectTone(tone) => {
                if !self.is_loading {
                    self.tone = tone;
                }
                Event::None
            }
            Message::Generate => self.handle_generate(image),
            Message::Generated { ticket, result } => {
                self.handle_generated(ticket, result);
                Event::None
            }
            Message::SlowNotice { ticket } => {
                if self.is_loading && self.pending == Some(ticket) {
                    self.is_slow = true;
                }
                Event::None
            }
            Message::SelectCaption(index) => {
                if !self.captions.select(index) {
                    log::debug!("Ignoring caption selection {index}");
                }
                Event::None
            }
            Message::Proceed => match self.captions.selected() {
                Some(caption) => Event::CaptionChosen(caption.to_string()),
                None => Event::None,
            },
        }
    }

    /// Invalidates the in-flight request, if any. Its response will be dropped.
    pub fn cancel_pending(&mut self) {
        if let Some(ticket) = self.pending.take() {
            log::debug!("Cancelled caption request {}", ticket.0);
        }
        self.is_loading = false;
        self.is_slow = false;
    }

    /// Returns to the initial state. Tickets are never reissued.
    pub fn reset(&mut self) {
        self.cancel_pending();
        *self = Self {
            last_ticket: self.last_ticket,
            ..Self::default()
        };
    }

    fn handle_generate(&mut self, image: Option<&StoredImage>) -> Event {
        if self.is_loading {
            return Event::None;
        }
        let Some(image) = image else {
            log::debug!("Ignoring generate without an image");
            return Event::None;
        };

        self.is_loading = true;
        self.is_slow = false;
        self.error = None;
        self.captions = CaptionSet::default();
        self.last_ticket += 1;
        let ticket = RequestTicket(self.last_ticket);
        self.pending = Some(ticket);

        Event::GenerationRequested(PendingGeneration {
            ticket,
            request: CaptionRequest {
                image: data_url::encode(image.media_type(), image.bytes()),
                tone: self.tone,
            },
        })
    }

    fn handle_generated(&mut self, ticket: RequestTicket, result: Result<Vec<String>, CaptionError>) {
        if self.pending != Some(ticket) {
            log::debug!("Dropping stale caption response {}", ticket.0);
            return;
        }
        self.pending = None;
        self.is_loading = false;
        self.is_slow = false;

        match result {
            Ok(captions) => self.captions = CaptionSet::new(captions),
            Err(e) => {
                log::warn!("Caption generation failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }
}

/// Runs one generation against `client`, giving up after `timeout`.
pub async fn run_generation<C: CaptionClient>(
    client: &C,
    pending: PendingGeneration,
    timeout: Duration,
) -> Message {
    let result = tokio::time::timeout(timeout, client.generate(pending.request))
        .await
        .unwrap_or(Err(CaptionError::TimedOut));
    Message::Generated {
        ticket: pending.ticket,
        result,
    }
}
