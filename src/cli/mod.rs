use clap::Parser;

use crate::config::{ DEFAULT_ANSWER_URL, DEFAULT_WELCOME_MESSAGE };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Answer Service Args ---
    /// Endpoint of the answer-generation service (receives POST {"question": ...})
    #[arg(long, env = "ANSWER_URL", default_value = DEFAULT_ANSWER_URL)]
    pub answer_url: String,

    /// Client-side timeout for one question/answer round trip, in seconds. 0 disables it.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    // --- Conversation Args ---
    /// Allow a new question while a previous one is still awaiting its answer.
    /// Answers are then appended in arrival order, not submission order.
    #[arg(long, env = "ALLOW_OVERLAP", default_value = "false")]
    pub allow_overlap: bool,

    /// Assistant message that opens every session.
    #[arg(long, env = "WELCOME_MESSAGE", default_value = DEFAULT_WELCOME_MESSAGE)]
    pub welcome_message: String,

    // --- General App Args ---
    /// Ask a single question, print the exchange and exit instead of starting the console.
    #[arg(long)]
    pub ask: Option<String>,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_service() {
        let args = Args::parse_from(["a320-assistant"]);
        assert_eq!(args.answer_url, DEFAULT_ANSWER_URL);
        assert_eq!(args.request_timeout_secs, 60);
        assert!(!args.allow_overlap);
        assert_eq!(args.welcome_message, DEFAULT_WELCOME_MESSAGE);
        assert!(args.ask.is_none());
    }

    #[test]
    fn one_shot_question_and_overlap_flag() {
        let args = Args::parse_from([
            "a320-assistant",
            "--allow-overlap",
            "--ask",
            "What is the MTOW of the A320?",
        ]);
        assert!(args.allow_overlap);
        assert_eq!(args.ask.as_deref(), Some("What is the MTOW of the A320?"));
    }
}
