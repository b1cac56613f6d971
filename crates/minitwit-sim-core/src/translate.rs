// ABOUTME: Reshapes backend messages into the simulator's wire format.
// ABOUTME: Keeps backend order, never sorts or filters, and clamps the requested count to what exists.

use crate::model::{ExternalMessage, Message};

/// Translate at most `limit` backend messages into wire messages.
///
/// The backend's feed endpoints already exclude flagged messages, so the
/// `flagged` marker is not consulted here.
pub fn translate(messages: &[Message], limit: usize) -> Vec<ExternalMessage> {
    messages
        .iter()
        .take(limit)
        .map(ExternalMessage::from)
        .collect()
}

/// Keep at most `limit` entries of a follow list. Never pads.
pub fn truncate_follows(mut follows: Vec<String>, limit: usize) -> Vec<String> {
    follows.truncate(limit);
    follows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| Message {
                id: format!("id-{i}"),
                username: format!("user{i}"),
                insertion_date: 1_000 + i as i64,
                tweet: format!("tweet {i}"),
                flagged: false,
            })
            .collect()
    }

    #[test]
    fn translate_limits_and_preserves_order() {
        let out = translate(&messages(10), 3);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].content, "tweet 0");
        assert_eq!(out[1].username, "user1");
        assert_eq!(out[2].pub_date, "1002");
    }

    #[test]
    fn translate_clamps_limit_to_available() {
        let out = translate(&messages(2), 100);
        assert_eq!(out.len(), 2);

        assert!(translate(&[], 5).is_empty());
    }

    #[test]
    fn translate_passes_flagged_messages_through() {
        let mut msgs = messages(2);
        msgs[0].flagged = true;

        assert_eq!(translate(&msgs, 2).len(), 2);
    }

    #[test]
    fn follows_are_truncated_not_padded() {
        let follows = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        assert_eq!(truncate_follows(follows.clone(), 2), vec!["a", "b"]);
        assert_eq!(truncate_follows(follows, 50).len(), 3);
    }
}
