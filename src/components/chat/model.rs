//! Chat log state, independent of the DOM.
//!
//! Each submitted question gets its own placeholder and, later, its own answer
//! bubble, so overlapping exchanges never write into each other's text.

use std::time::Duration;

use crate::config::RevealConfig;

pub const NO_ANSWER: &str = "Sorry, I did not receive an answer.";
pub const NETWORK_ERROR: &str = "Network error, please try again later.";
pub const THINKING: &str = "Thinking...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
	User,
	Bot,
}

impl Sender {
	pub fn css_class(self) -> &'static str {
		match self {
			Sender::User => "user",
			Sender::Bot => "bot",
		}
	}

	pub fn avatar(self) -> &'static str {
		match self {
			Sender::User => "👤",
			Sender::Bot => "🤖",
		}
	}
}

/// Character-by-character disclosure of an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
	chars: Vec<char>,
	shown: usize,
	interval: Duration,
}

impl Reveal {
	pub fn new(text: &str, config: &RevealConfig) -> Self {
		let chars: Vec<char> = text.chars().collect();
		let interval = config.interval_for(chars.len());
		Self {
			chars,
			shown: 0,
			interval,
		}
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	pub fn visible(&self) -> String {
		self.chars[..self.shown].iter().collect()
	}

	pub fn is_complete(&self) -> bool {
		self.shown >= self.chars.len()
	}

	/// Show one more character. Returns `false` once there is nothing left.
	pub fn step(&mut self) -> bool {
		if self.is_complete() {
			return false;
		}
		self.shown += 1;
		true
	}

	pub fn full_text(&self) -> String {
		self.chars.iter().collect()
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody {
	Text(String),
	/// Placeholder while the answer is on its way.
	Typing,
	Revealing(Reveal),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
	pub id: MessageId,
	pub sender: Sender,
	pub body: MessageBody,
}

impl ChatMessage {
	pub fn text(&self) -> String {
		match &self.body {
			MessageBody::Text(t) => t.clone(),
			MessageBody::Typing => THINKING.to_string(),
			MessageBody::Revealing(r) => r.visible(),
		}
	}

	/// Still animating: the placeholder, or an unfinished reveal.
	pub fn is_typing(&self) -> bool {
		match &self.body {
			MessageBody::Text(_) => false,
			MessageBody::Typing => true,
			MessageBody::Revealing(r) => !r.is_complete(),
		}
	}
}

/// A question in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
	pub question: String,
	pub placeholder: MessageId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStep {
	/// One more character is visible.
	Advanced,
	/// Everything is visible; stop the timer.
	Finished,
	/// The bubble is gone or not revealing; stop the timer.
	Missing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatLog {
	messages: Vec<ChatMessage>,
	next_id: u64,
}

impl ChatLog {
	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	fn push(&mut self, sender: Sender, body: MessageBody) -> MessageId {
		let id = MessageId(self.next_id);
		self.next_id += 1;
		self.messages.push(ChatMessage { id, sender, body });
		id
	}

	fn remove(&mut self, id: MessageId) {
		self.messages.retain(|m| m.id != id);
	}

	/// Record the user's question and show a placeholder. Blank input is ignored.
	pub fn submit(&mut self, input: &str) -> Option<Exchange> {
		let question = input.trim();
		if question.is_empty() {
			return None;
		}
		self.push(Sender::User, MessageBody::Text(question.to_string()));
		let placeholder = self.push(Sender::Bot, MessageBody::Typing);
		Some(Exchange {
			question: question.to_string(),
			placeholder,
		})
	}

	/// Swap the placeholder for a bubble that will reveal `answer`.
	pub fn answer(
		&mut self,
		exchange: &Exchange,
		answer: Option<&str>,
		config: &RevealConfig,
	) -> (MessageId, Duration) {
		self.remove(exchange.placeholder);
		let text = answer.filter(|a| !a.trim().is_empty()).unwrap_or(NO_ANSWER);
		let reveal = Reveal::new(text, config);
		let interval = reveal.interval();
		(self.push(Sender::Bot, MessageBody::Revealing(reveal)), interval)
	}

	/// Swap the placeholder for a static error message.
	pub fn fail(&mut self, exchange: &Exchange) -> MessageId {
		self.remove(exchange.placeholder);
		self.push(Sender::Bot, MessageBody::Text(NETWORK_ERROR.to_string()))
	}

	/// Advance the reveal in bubble `id` by one character.
	pub fn advance(&mut self, id: MessageId) -> RevealStep {
		let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
			return RevealStep::Missing;
		};
		let MessageBody::Revealing(reveal) = &mut message.body else {
			return RevealStep::Missing;
		};
		if reveal.step() && !reveal.is_complete() {
			return RevealStep::Advanced;
		}
		let full = reveal.full_text();
		message.body = MessageBody::Text(full);
		RevealStep::Finished
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> RevealConfig {
		RevealConfig::default()
	}

	/// Ticks until the bubble holds the whole answer, with the elapsed time.
	fn run_reveal(log: &mut ChatLog, id: MessageId, interval: Duration) -> Duration {
		let mut elapsed = Duration::ZERO;
		loop {
			elapsed += interval;
			if log.advance(id) != RevealStep::Advanced {
				return elapsed;
			}
		}
	}

	#[test]
	fn blank_input_is_ignored() {
		let mut log = ChatLog::default();
		assert_eq!(log.submit("   "), None);
		assert!(log.messages().is_empty());
	}

	#[test]
	fn submit_adds_question_and_placeholder() {
		let mut log = ChatLog::default();
		let exchange = log.submit("  where to go?  ").unwrap();

		assert_eq!(exchange.question, "where to go?");
		let messages = log.messages();
		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].sender, Sender::User);
		assert_eq!(messages[0].text(), "where to go?");
		assert_eq!(messages[1].id, exchange.placeholder);
		assert_eq!(messages[1].body, MessageBody::Typing);
		assert!(messages[1].is_typing());
	}

	#[test]
	fn answer_replaces_placeholder_and_reveals_in_order() {
		let mut log = ChatLog::default();
		let exchange = log.submit("hi").unwrap();
		let (id, _) = log.answer(&exchange, Some("héllo"), &config());

		assert!(log.messages().iter().all(|m| m.id != exchange.placeholder));
		let bubble = |log: &ChatLog| log.messages().iter().find(|m| m.id == id).unwrap().text();
		assert_eq!(bubble(&log), "");
		assert_eq!(log.advance(id), RevealStep::Advanced);
		assert_eq!(bubble(&log), "h");
		assert_eq!(log.advance(id), RevealStep::Advanced);
		assert_eq!(bubble(&log), "hé");
		log.advance(id);
		log.advance(id);
		assert_eq!(log.advance(id), RevealStep::Finished);
		assert_eq!(bubble(&log), "héllo");
		assert!(!log.messages().last().unwrap().is_typing());
		assert_eq!(log.advance(id), RevealStep::Missing);
	}

	#[test]
	fn short_answers_finish_within_twenty_ms_per_char() {
		for len in [1usize, 7, 60, 120] {
			let mut log = ChatLog::default();
			let exchange = log.submit("q").unwrap();
			let text = "a".repeat(len);
			let (id, interval) = log.answer(&exchange, Some(&text), &config());

			assert_eq!(interval, Duration::from_millis(20));
			let elapsed = run_reveal(&mut log, id, interval);
			assert!(elapsed <= Duration::from_millis(20) * len as u32, "len={len} took {elapsed:?}");
			assert_eq!(log.messages().last().unwrap().text(), text);
		}
	}

	#[test]
	fn long_answers_use_the_slower_interval() {
		let mut log = ChatLog::default();
		let exchange = log.submit("q").unwrap();
		let text = "b".repeat(121);
		let (id, interval) = log.answer(&exchange, Some(&text), &config());

		assert_eq!(interval, Duration::from_millis(35));
		let elapsed = run_reveal(&mut log, id, interval);
		assert_eq!(elapsed, Duration::from_millis(35) * 121);
	}

	#[test]
	fn missing_or_blank_answer_uses_fallback() {
		let mut log = ChatLog::default();
		let first = log.submit("a").unwrap();
		let second = log.submit("b").unwrap();
		let (id1, _) = log.answer(&first, None, &config());
		let (id2, _) = log.answer(&second, Some(" "), &config());

		let texts: Vec<String> = [id1, id2]
			.into_iter()
			.map(|id| match &log.messages().iter().find(|m| m.id == id).unwrap().body {
				MessageBody::Revealing(r) => r.full_text(),
				other => panic!("unexpected body {other:?}"),
			})
			.collect();
		assert_eq!(texts, vec![NO_ANSWER, NO_ANSWER]);
	}

	#[test]
	fn failure_shows_static_error_without_animation() {
		let mut log = ChatLog::default();
		let exchange = log.submit("q").unwrap();
		let id = log.fail(&exchange);

		let last = log.messages().last().unwrap();
		assert_eq!(last.id, id);
		assert_eq!(last.body, MessageBody::Text(NETWORK_ERROR.into()));
		assert_eq!(log.advance(id), RevealStep::Missing);
		assert_eq!(log.messages().len(), 2);
	}

	#[test]
	fn overlapping_exchanges_keep_their_own_bubbles() {
		let mut log = ChatLog::default();
		let first = log.submit("one").unwrap();
		let second = log.submit("two").unwrap();
		assert_eq!(
			log.messages().iter().filter(|m| m.body == MessageBody::Typing).count(),
			2
		);

		// Second resolves first.
		let (b, _) = log.answer(&second, Some("BB"), &config());
		let (a, _) = log.answer(&first, Some("A"), &config());
		log.advance(b);
		log.advance(a);
		log.advance(b);

		let text_of = |id| log.messages().iter().find(|m| m.id == id).unwrap().text();
		assert_eq!(text_of(a), "A");
		assert_eq!(text_of(b), "BB");
	}
}
