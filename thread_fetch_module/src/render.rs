use std::collections::HashMap;

use crate::message::Message;

/// Separates message blocks inside one thread.
pub const MESSAGE_SEPARATOR: &str = "\n\n";
/// Separates whole threads; distinct from [`MESSAGE_SEPARATOR`].
pub const THREAD_SEPARATOR: &str = "\n\n----------\n\n";

/// Result of fetching a lead's conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadThread {
    /// The lead has no emails. Callers treat this as nothing to report.
    NoMessages,
    Conversation(String),
}

impl LeadThread {
    pub fn from_messages(messages: Vec<Message>) -> Self {
        if messages.is_empty() {
            return LeadThread::NoMessages;
        }
        LeadThread::Conversation(render_threads(&group_into_threads(messages)))
    }

    /// Rendered text, or an empty string for [`LeadThread::NoMessages`].
    pub fn text(&self) -> &str {
        match self {
            LeadThread::NoMessages => "",
            LeadThread::Conversation(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LeadThread::NoMessages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: String,
    pub messages: Vec<Message>,
}

/// Group messages by thread id.
///
/// Threads keep the order in which their first message appeared in the
/// response. Messages inside a thread are sorted by timestamp string; the
/// sort is stable so equal timestamps keep response order.
pub fn group_into_threads(messages: Vec<Message>) -> Vec<Thread> {
    let mut threads: Vec<Thread> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for message in messages {
        let key = message.thread_key().to_string();
        match positions.get(&key) {
            Some(&position) => threads[position].messages.push(message),
            None => {
                positions.insert(key.clone(), threads.len());
                threads.push(Thread {
                    id: key,
                    messages: vec![message],
                });
            }
        }
    }

    for thread in &mut threads {
        thread
            .messages
            .sort_by(|left, right| left.timestamp_key().cmp(right.timestamp_key()));
    }
    threads
}

pub fn render_threads(threads: &[Thread]) -> String {
    threads
        .iter()
        .map(render_thread)
        .collect::<Vec<_>>()
        .join(THREAD_SEPARATOR)
}

fn render_thread(thread: &Thread) -> String {
    let blocks = thread
        .messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR);
    format!("=== Thread {} ===\n{}", thread.id, blocks)
}

fn render_message(message: &Message) -> String {
    let mut block = format!(
        "[{}] {}: {}",
        message.timestamp_key(),
        message.sender,
        message.subject
    );
    if !message.body.is_empty() {
        block.push('\n');
        block.push_str(&message.body);
    }
    block
}
