//! Link-preview crawler detection.
//!
//! Messaging platforms fetch shared links to render previews. If such a fetch
//! hits `/auth` it would silently consume the one-time token before the human
//! ever clicks, so the auth endpoint screens requests against this table and
//! answers crawlers with a neutral 200 and zero store access. Detection is
//! best effort: a missed bot falls through to the normal redemption path,
//! which is still safe.

/// Lowercase substrings of known link-preview and bot user agents.
const CRAWLER_SIGNATURES: &[&str] = &[
    "telegrambot",
    "bot.html",
    "whatsapp",
    "twitterbot",
    "slackbot",
    "discordbot",
    "facebookexternalhit",
    "linkedinbot",
    "skypeuripreview",
];

/// Heuristic: does this `User-Agent` look like a link-preview crawler?
#[must_use]
pub fn is_probable_crawler(user_agent: &str) -> bool {
    let user_agent = user_agent.to_lowercase();
    CRAWLER_SIGNATURES
        .iter()
        .any(|signature| user_agent.contains(signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_crawlers_are_detected() {
        let cases = [
            "TelegramBot (like TwitterBot)",
            "Mozilla/5.0 (compatible; TelegramBot/1.0; +https://core.telegram.org/bots/webhooks)",
            "WhatsApp/2.23.20.0",
            "Twitterbot/1.0",
            "Slackbot-LinkExpanding 1.0 (+https://api.slack.com/robots)",
            "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)",
            "facebookexternalhit/1.1",
            "LinkedInBot/1.0",
            "SkypeUriPreview Preview/0.5",
            "something bot.html something",
        ];
        for user_agent in cases {
            assert!(is_probable_crawler(user_agent), "missed: {user_agent}");
        }
    }

    #[test]
    fn browsers_pass_through() {
        let cases = [
            "",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Safari/604.1",
            "curl/8.4.0",
        ];
        for user_agent in cases {
            assert!(!is_probable_crawler(user_agent), "false positive: {user_agent}");
        }
    }
}
