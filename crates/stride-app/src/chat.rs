// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info};

use crate::{ChatMessage, MessageId, Sender as MessageSender};

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_REPLY_TEXT: &str =
    "Thanks for your question! Let me help you with that. Keep up the great work!";

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<OffsetDateTime>,
}

impl FixedClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now.get()
    }
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    let layout = format_description!("[hour repr:24]:[minute]");
    at.format(layout)
        .unwrap_or_else(|_| format!("{:02}:{:02}", at.hour(), at.minute()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyTicket(u64);

impl ReplyTicket {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One-shot timers keyed by ticket. A cancelled ticket must never be
/// reported by `poll_fired`.
pub trait ReplyTimer {
    fn start(&mut self, ticket: ReplyTicket, delay: Duration);
    fn cancel(&mut self, ticket: ReplyTicket) -> bool;
    fn cancel_all(&mut self) -> usize;
    /// Tickets whose delay has elapsed, in firing order. Non-blocking.
    fn poll_fired(&mut self) -> Vec<ReplyTicket>;

    /// Like `poll_fired`, but may block up to `timeout` for the first ticket.
    fn wait_fired(&mut self, _timeout: Duration) -> Vec<ReplyTicket> {
        self.poll_fired()
    }
}

/// Real-time timer: one sleeping thread per ticket. Dropping the ticket's
/// cancel sender wakes the thread early and it exits without firing.
pub struct ThreadTimer {
    fired_tx: Sender<ReplyTicket>,
    fired_rx: Receiver<ReplyTicket>,
    armed: HashMap<ReplyTicket, Sender<()>>,
}

impl ThreadTimer {
    pub fn new() -> Self {
        let (fired_tx, fired_rx) = mpsc::channel();
        Self {
            fired_tx,
            fired_rx,
            armed: HashMap::new(),
        }
    }

    fn take_armed(&mut self, fired: impl IntoIterator<Item = ReplyTicket>) -> Vec<ReplyTicket> {
        // a ticket cancelled after its thread woke can still arrive here
        fired
            .into_iter()
            .filter(|ticket| self.armed.remove(ticket).is_some())
            .collect()
    }
}

impl Default for ThreadTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyTimer for ThreadTimer {
    fn start(&mut self, ticket: ReplyTicket, delay: Duration) {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let fired_tx = self.fired_tx.clone();
        thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(delay) {
                let _ = fired_tx.send(ticket);
            }
        });
        self.armed.insert(ticket, cancel_tx);
    }

    fn cancel(&mut self, ticket: ReplyTicket) -> bool {
        self.armed.remove(&ticket).is_some()
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.armed.len();
        self.armed.clear();
        count
    }

    fn poll_fired(&mut self) -> Vec<ReplyTicket> {
        let fired: Vec<ReplyTicket> = self.fired_rx.try_iter().collect();
        self.take_armed(fired)
    }

    fn wait_fired(&mut self, timeout: Duration) -> Vec<ReplyTicket> {
        if self.armed.is_empty() {
            return Vec::new();
        }
        let mut fired = match self.fired_rx.recv_timeout(timeout) {
            Ok(ticket) => vec![ticket],
            Err(_) => return Vec::new(),
        };
        fired.extend(self.fired_rx.try_iter());
        self.take_armed(fired)
    }
}

/// Virtual-time timer for tests and scripted drivers. Time only moves on
/// `advance` (or `wait_fired`, which advances by the full timeout).
#[derive(Debug, Default)]
pub struct ManualTimer {
    elapsed: Duration,
    armed: BTreeMap<ReplyTicket, Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    pub fn armed(&self) -> usize {
        self.armed.len()
    }
}

impl ReplyTimer for ManualTimer {
    fn start(&mut self, ticket: ReplyTicket, delay: Duration) {
        self.armed.insert(ticket, self.elapsed + delay);
    }

    fn cancel(&mut self, ticket: ReplyTicket) -> bool {
        self.armed.remove(&ticket).is_some()
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.armed.len();
        self.armed.clear();
        count
    }

    fn poll_fired(&mut self) -> Vec<ReplyTicket> {
        let mut due: Vec<(Duration, ReplyTicket)> = self
            .armed
            .iter()
            .filter(|(_, deadline)| **deadline <= self.elapsed)
            .map(|(ticket, deadline)| (*deadline, *ticket))
            .collect();
        due.sort();
        for (_, ticket) in &due {
            self.armed.remove(ticket);
        }
        due.into_iter().map(|(_, ticket)| ticket).collect()
    }

    fn wait_fired(&mut self, timeout: Duration) -> Vec<ReplyTicket> {
        self.advance(timeout);
        self.poll_fired()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTemplate(String);

impl ReplyTemplate {
    pub const QUESTION_PLACEHOLDER: &'static str = "{question}";

    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn render(&self, question: &str) -> String {
        self.0.replace(Self::QUESTION_PLACEHOLDER, question)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReplyTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_TEXT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub reply_delay: Duration,
    pub reply: ReplyTemplate,
    /// `None` allows any number of replies in flight.
    pub max_pending: Option<usize>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            reply: ReplyTemplate::default(),
            max_pending: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SubmitOutcome {
    Sent {
        message: MessageId,
        ticket: ReplyTicket,
    },
    Blank,
    Busy,
    Closed,
}

impl SubmitOutcome {
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Append-only chat log for one conversation plus its simulated coach.
///
/// Ids are assigned in append order starting after the highest seeded id.
/// Every accepted submission arms its own reply timer; replies land in the
/// order the timers fire. Closing (or dropping) the session cancels every
/// timer still armed.
pub struct ChatSession<T: ReplyTimer, C: Clock> {
    log: Vec<ChatMessage>,
    next_id: MessageId,
    next_ticket: u64,
    pending: BTreeMap<ReplyTicket, String>,
    timer: T,
    clock: C,
    config: ChatConfig,
    closed: bool,
}

impl<T: ReplyTimer, C: Clock> ChatSession<T, C> {
    pub fn new(history: Vec<ChatMessage>, timer: T, clock: C, config: ChatConfig) -> Self {
        let next_id = history
            .iter()
            .map(|message| message.id)
            .max()
            .map_or(MessageId::new(1), MessageId::next);
        Self {
            log: history,
            next_id,
            next_ticket: 1,
            pending: BTreeMap::new(),
            timer,
            clock,
            config,
            closed: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.log
    }

    pub fn state(&self) -> ChatState {
        if self.pending.is_empty() {
            ChatState::Idle
        } else {
            ChatState::AwaitingReply
        }
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if self.closed {
            return SubmitOutcome::Closed;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Blank;
        }
        if let Some(limit) = self.config.max_pending
            && self.pending.len() >= limit
        {
            debug!(
                pending = self.pending.len(),
                limit,
                "chat submit ignored while awaiting reply"
            );
            return SubmitOutcome::Busy;
        }

        let message = self.append(MessageSender::User, trimmed.to_owned());
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(ticket, trimmed.to_owned());
        self.timer.start(ticket, self.config.reply_delay);
        debug!(id = %message, ticket = ticket.get(), "chat message submitted");

        SubmitOutcome::Sent { message, ticket }
    }

    /// Appends the coach reply for `ticket`. Unknown or already delivered
    /// tickets are ignored.
    pub fn deliver(&mut self, ticket: ReplyTicket) -> Option<MessageId> {
        let question = self.pending.remove(&ticket)?;
        let text = self.config.reply.render(&question);
        let id = self.append(MessageSender::Assistant, text);
        debug!(id = %id, ticket = ticket.get(), "coach reply delivered");
        Some(id)
    }

    /// Delivers every reply whose timer has fired. Non-blocking.
    pub fn pump(&mut self) -> Vec<MessageId> {
        let fired = self.timer.poll_fired();
        self.deliver_all(fired)
    }

    /// Blocks up to `timeout` for at least one reply when any are pending.
    pub fn wait_for_reply(&mut self, timeout: Duration) -> Vec<MessageId> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let fired = self.timer.wait_fired(timeout);
        self.deliver_all(fired)
    }

    /// Ends the session: cancels outstanding reply timers and rejects
    /// further submissions. Returns how many timers were cancelled.
    pub fn close(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        self.closed = true;
        self.pending.clear();
        let cancelled = self.timer.cancel_all();
        if cancelled > 0 {
            info!(cancelled, "chat session closed with replies in flight");
        }
        cancelled
    }

    fn deliver_all(&mut self, fired: Vec<ReplyTicket>) -> Vec<MessageId> {
        fired
            .into_iter()
            .filter_map(|ticket| self.deliver(ticket))
            .collect()
    }

    fn append(&mut self, sender: MessageSender, text: String) -> MessageId {
        let id = self.next_id;
        self.next_id = id.next();
        self.log.push(ChatMessage {
            id,
            sender,
            text,
            timestamp: format_timestamp(self.clock.now()),
        });
        id
    }
}

impl<T: ReplyTimer, C: Clock> Drop for ChatSession<T, C> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChatConfig, ChatSession, ChatState, FixedClock, ManualTimer, ReplyTemplate, ReplyTimer,
        SubmitOutcome, ThreadTimer, format_timestamp,
    };
    use crate::{ChatMessage, MessageId, Sender};
    use std::time::Duration;
    use time::macros::datetime;

    const DELAY: Duration = Duration::from_millis(1000);

    fn session(history: Vec<ChatMessage>) -> ChatSession<ManualTimer, FixedClock> {
        ChatSession::new(
            history,
            ManualTimer::new(),
            FixedClock::new(datetime!(2024-09-16 14:30 UTC)),
            ChatConfig::default(),
        )
    }

    fn seeded(id: i64, sender: Sender, text: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(id),
            sender,
            text: text.to_owned(),
            timestamp: "14:30".to_owned(),
        }
    }

    fn texts(session: &ChatSession<ManualTimer, FixedClock>) -> Vec<(Sender, String)> {
        session
            .messages()
            .iter()
            .map(|message| (message.sender, message.text.clone()))
            .collect()
    }

    #[test]
    fn blank_submission_is_a_no_op() {
        let mut chat = session(Vec::new());
        assert_eq!(chat.submit("   "), SubmitOutcome::Blank);
        assert_eq!(chat.submit(""), SubmitOutcome::Blank);
        assert!(chat.messages().is_empty());
        assert_eq!(chat.state(), ChatState::Idle);
        assert_eq!(chat.timer_mut().armed(), 0);
    }

    #[test]
    fn submit_appends_trimmed_user_message_then_reply_after_delay() {
        let mut chat = session(vec![seeded(3, Sender::Assistant, "Ready?")]);

        let outcome = chat.submit("  Hello ");
        assert!(outcome.is_sent());
        assert_eq!(chat.state(), ChatState::AwaitingReply);
        let last = chat.messages().last().expect("user message appended");
        assert_eq!(last.id, MessageId::new(4));
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "Hello");
        assert_eq!(last.timestamp, "14:30");

        chat.timer_mut().advance(DELAY - Duration::from_millis(1));
        assert!(chat.pump().is_empty());
        assert_eq!(chat.messages().len(), 2);

        chat.timer_mut().advance(Duration::from_millis(1));
        assert_eq!(chat.pump(), vec![MessageId::new(5)]);
        assert_eq!(chat.state(), ChatState::Idle);
        let reply = chat.messages().last().expect("reply appended");
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.text, super::DEFAULT_REPLY_TEXT);
    }

    #[test]
    fn rapid_submissions_each_get_their_own_reply() {
        let mut chat = session(Vec::new());
        assert!(chat.submit("A").is_sent());
        chat.timer_mut().advance(Duration::from_millis(200));
        assert!(chat.submit("B").is_sent());
        assert_eq!(chat.pending_replies(), 2);
        assert_eq!(
            texts(&chat),
            vec![(Sender::User, "A".to_owned()), (Sender::User, "B".to_owned())]
        );

        chat.timer_mut().advance(DELAY);
        let delivered = chat.pump();
        assert_eq!(delivered, vec![MessageId::new(3), MessageId::new(4)]);
        let senders: Vec<Sender> = chat.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::User, Sender::User, Sender::Assistant, Sender::Assistant]
        );
    }

    #[test]
    fn ids_stay_monotonic_across_interleaving() {
        let mut chat = session(vec![seeded(1, Sender::Assistant, "hi")]);
        assert!(chat.submit("one").is_sent());
        chat.timer_mut().advance(DELAY);
        chat.pump();
        assert!(chat.submit("two").is_sent());
        chat.timer_mut().advance(DELAY);
        chat.pump();

        let ids: Vec<i64> = chat.messages().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn timestamps_follow_the_clock() {
        let mut chat = session(Vec::new());
        assert!(chat.submit("early").is_sent());
        chat.clock().advance(Duration::from_secs(90));
        chat.timer_mut().advance(DELAY);
        chat.pump();
        let stamps: Vec<&str> = chat.messages().iter().map(|m| m.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["14:30", "14:31"]);
    }

    #[test]
    fn pending_cap_rejects_resubmission_until_reply() {
        let mut chat = ChatSession::new(
            Vec::new(),
            ManualTimer::new(),
            FixedClock::new(datetime!(2024-09-16 08:05 UTC)),
            ChatConfig {
                max_pending: Some(1),
                ..ChatConfig::default()
            },
        );
        assert!(chat.submit("first").is_sent());
        assert_eq!(chat.submit("second"), SubmitOutcome::Busy);
        assert_eq!(chat.messages().len(), 1);

        chat.timer_mut().advance(DELAY);
        chat.pump();
        assert!(chat.submit("second").is_sent());
    }

    #[test]
    fn template_reply_includes_question() {
        let mut chat = ChatSession::new(
            Vec::new(),
            ManualTimer::new(),
            FixedClock::new(datetime!(2024-09-16 08:05 UTC)),
            ChatConfig {
                reply: ReplyTemplate::new("You asked: {question}"),
                ..ChatConfig::default()
            },
        );
        assert!(chat.submit(" form tips? ").is_sent());
        chat.timer_mut().advance(DELAY);
        chat.pump();
        assert_eq!(
            chat.messages().last().map(|m| m.text.as_str()),
            Some("You asked: form tips?")
        );
    }

    #[test]
    fn close_cancels_outstanding_timers_and_rejects_input() {
        let mut chat = session(Vec::new());
        assert!(chat.submit("A").is_sent());
        assert!(chat.submit("B").is_sent());

        assert_eq!(chat.close(), 2);
        assert_eq!(chat.timer_mut().armed(), 0);
        chat.timer_mut().advance(DELAY * 2);
        assert!(chat.pump().is_empty());
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.submit("C"), SubmitOutcome::Closed);
        assert_eq!(chat.close(), 0);
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let mut chat = session(Vec::new());
        let SubmitOutcome::Sent { ticket, .. } = chat.submit("hi") else {
            panic!("submission should be accepted");
        };
        assert!(chat.deliver(ticket).is_some());
        assert!(chat.deliver(ticket).is_none());
        assert_eq!(chat.messages().len(), 2);
    }

    #[test]
    fn wait_for_reply_without_pending_returns_immediately() {
        let mut chat = session(Vec::new());
        assert!(chat.wait_for_reply(DELAY).is_empty());
        assert_eq!(chat.timer_mut().armed(), 0);
    }

    #[test]
    fn manual_timer_fires_in_deadline_order() {
        let mut timer = ManualTimer::new();
        timer.start(super::ReplyTicket(2), Duration::from_millis(10));
        timer.start(super::ReplyTicket(1), Duration::from_millis(20));
        assert_eq!(
            timer.wait_fired(Duration::from_millis(30)),
            vec![super::ReplyTicket(2), super::ReplyTicket(1)]
        );
    }

    #[test]
    fn thread_timer_fires_and_honors_cancel() {
        let mut timer = ThreadTimer::new();
        timer.start(super::ReplyTicket(1), Duration::from_millis(10));
        timer.start(super::ReplyTicket(2), Duration::from_secs(30));
        assert!(timer.cancel(super::ReplyTicket(2)));

        let fired = timer.wait_fired(Duration::from_secs(5));
        assert_eq!(fired, vec![super::ReplyTicket(1)]);
        assert!(timer.wait_fired(Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn timestamp_uses_24_hour_clock() {
        assert_eq!(format_timestamp(datetime!(2024-09-16 21:07 UTC)), "21:07");
        assert_eq!(format_timestamp(datetime!(2024-09-16 00:00 UTC)), "00:00");
    }
}
