//! Notification message formatting.
//!
//! One pure function per event variant, producing Telegram MarkdownV2.
//! Every user-supplied string (commit messages, titles, names, logins) is
//! escaped before insertion, and the template literals themselves escape
//! the punctuation MarkdownV2 reserves. Code spans and link targets have
//! their own smaller escape classes.

use std::fmt::Write as _;

use crate::event::{CommitSummary, GithubEvent};
use crate::utils::{escape_code, escape_link_url, escape_markdown, truncate_text};

/// How many individual commits a push notification shows before the
/// "... and N more commits" trailer.
const MAX_COMMITS_SHOWN: usize = 3;
const MAX_COMMIT_MSG_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 200;

/// Renders an event as a notification message.
/// `Unhandled` events produce no message and suppress delivery.
pub fn format_event(event: &GithubEvent) -> Option<String> {
    match event {
        GithubEvent::Push {
            repo_name,
            branch,
            pusher,
            repo_url,
            commits,
        } => Some(format_push(repo_name, branch, pusher, repo_url, commits)),
        GithubEvent::PullRequest {
            action,
            number,
            title,
            author,
            url,
            repo_name,
        } => Some(format_pull_request(
            action, *number, title, author, url, repo_name,
        )),
        GithubEvent::Issue {
            action,
            number,
            title,
            author,
            url,
            repo_name,
        } => Some(format_issue(action, *number, title, author, url, repo_name)),
        GithubEvent::Star {
            repo_name,
            star_count,
            user,
            repo_url,
        } => Some(format_star(repo_name, *star_count, user, repo_url)),
        GithubEvent::Fork {
            repo_name,
            fork_count,
            user,
            fork_url,
        } => Some(format_fork(repo_name, *fork_count, user, fork_url)),
        GithubEvent::Release {
            repo_name,
            name,
            tag,
            author,
            url,
        } => Some(format_release(repo_name, name, tag, author, url)),
        GithubEvent::Unhandled => None,
    }
}

fn format_push(
    repo_name: &str,
    branch: &str,
    pusher: &str,
    repo_url: &str,
    commits: &[CommitSummary],
) -> String {
    let total = commits.len();
    let commit_word = if total == 1 { "commit" } else { "commits" };

    let mut message = format!(
        "📝 *New {} to {}*\n\n",
        commit_word,
        escape_markdown(repo_name)
    );
    writeln!(message, "🌿 Branch: `{}`", escape_code(branch)).ok();
    writeln!(message, "👤 Pusher: {}", escape_markdown(pusher)).ok();
    write!(message, "📊 {} {}\n\n", total, commit_word).ok();

    for commit in commits.iter().take(MAX_COMMITS_SHOWN) {
        let summary = truncate_text(&commit.message, MAX_COMMIT_MSG_LEN);
        writeln!(message, "🔸 *{}*", escape_markdown(&summary)).ok();
        write!(
            message,
            "👤 {} • `{}`\n\n",
            escape_markdown(&commit.author),
            escape_code(&commit.short_sha)
        )
        .ok();
    }

    if total > MAX_COMMITS_SHOWN {
        write!(
            message,
            "\\.\\.\\. and {} more commits\n\n",
            total - MAX_COMMITS_SHOWN
        )
        .ok();
    }

    write!(message, "🔗 [View Repository]({})", escape_link_url(repo_url)).ok();
    message
}

fn format_pull_request(
    action: &str,
    number: u64,
    title: &str,
    author: &str,
    url: &str,
    repo_name: &str,
) -> String {
    let (emoji, label) = match action {
        "opened" => ("🟢", "Opened"),
        "closed" => ("🔴", "Closed"),
        "merged" => ("🟣", "Merged"),
        _ => ("📋", "Updated"),
    };

    let mut message = format!("{} *Pull Request {}*\n\n", emoji, label);
    writeln!(message, "📦 Repository: {}", escape_markdown(repo_name)).ok();
    writeln!(
        message,
        "🔧 PR \\#{}: {}",
        number,
        escape_markdown(&truncate_text(title, MAX_TITLE_LEN))
    )
    .ok();
    write!(message, "👤 Author: {}\n\n", escape_markdown(author)).ok();
    write!(message, "🔗 [View Pull Request]({})", escape_link_url(url)).ok();
    message
}

fn format_issue(
    action: &str,
    number: u64,
    title: &str,
    author: &str,
    url: &str,
    repo_name: &str,
) -> String {
    let (emoji, label) = match action {
        "opened" => ("🟢", "Opened"),
        "closed" => ("🔴", "Closed"),
        "reopened" => ("🟡", "Reopened"),
        _ => ("🐛", "Updated"),
    };

    let mut message = format!("{} *Issue {}*\n\n", emoji, label);
    writeln!(message, "📦 Repository: {}", escape_markdown(repo_name)).ok();
    writeln!(
        message,
        "🐛 Issue \\#{}: {}",
        number,
        escape_markdown(&truncate_text(title, MAX_TITLE_LEN))
    )
    .ok();
    write!(message, "👤 Author: {}\n\n", escape_markdown(author)).ok();
    write!(message, "🔗 [View Issue]({})", escape_link_url(url)).ok();
    message
}

fn format_star(repo_name: &str, star_count: u64, user: &str, repo_url: &str) -> String {
    let mut message = String::from("⭐ *New Star\\!*\n\n");
    writeln!(message, "📦 Repository: {}", escape_markdown(repo_name)).ok();
    writeln!(message, "👤 Starred by: {}", escape_markdown(user)).ok();
    write!(message, "📊 Total stars: {}\n\n", star_count).ok();
    write!(message, "🔗 [View Repository]({})", escape_link_url(repo_url)).ok();
    message
}

fn format_fork(repo_name: &str, fork_count: u64, user: &str, fork_url: &str) -> String {
    let mut message = String::from("🍴 *New Fork\\!*\n\n");
    writeln!(message, "📦 Repository: {}", escape_markdown(repo_name)).ok();
    writeln!(message, "👤 Forked by: {}", escape_markdown(user)).ok();
    write!(message, "📊 Total forks: {}\n\n", fork_count).ok();
    write!(message, "🔗 [View Fork]({})", escape_link_url(fork_url)).ok();
    message
}

fn format_release(repo_name: &str, name: &str, tag: &str, author: &str, url: &str) -> String {
    let mut message = String::from("🚀 *New Release\\!*\n\n");
    writeln!(message, "📦 Repository: {}", escape_markdown(repo_name)).ok();
    writeln!(
        message,
        "🏷️ Release: {} \\({}\\)",
        escape_markdown(name),
        escape_markdown(tag)
    )
    .ok();
    write!(message, "👤 Author: {}\n\n", escape_markdown(author)).ok();
    write!(message, "🔗 [View Release]({})", escape_link_url(url)).ok();
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(n: usize) -> CommitSummary {
        CommitSummary {
            message: format!("commit message {}", n),
            author: "alice".to_string(),
            short_sha: format!("{:07x}", n),
        }
    }

    #[test]
    fn push_caps_commit_entries_at_three() {
        let commits: Vec<_> = (1..=5).map(commit).collect();
        let event = GithubEvent::Push {
            repo_name: "a/b".to_string(),
            branch: "main".to_string(),
            pusher: "alice".to_string(),
            repo_url: "https://github.com/a/b".to_string(),
            commits,
        };
        let message = format_event(&event).unwrap();

        assert_eq!(message.matches("🔸").count(), 3);
        assert!(message.contains("2 more commits"));
        assert!(message.contains("📊 5 commits"));
        assert!(!message.contains("commit message 4"));
    }

    #[test]
    fn push_with_one_commit_uses_singular() {
        let event = GithubEvent::Push {
            repo_name: "a/b".to_string(),
            branch: "main".to_string(),
            pusher: "alice".to_string(),
            repo_url: String::new(),
            commits: vec![commit(1)],
        };
        let message = format_event(&event).unwrap();
        assert!(message.contains("New commit to"));
        assert!(message.contains("📊 1 commit\n"));
        assert!(!message.contains("more commits"));
    }

    #[test]
    fn push_preserves_commit_order() {
        let commits: Vec<_> = (1..=3).map(commit).collect();
        let event = GithubEvent::Push {
            repo_name: "a/b".to_string(),
            branch: "main".to_string(),
            pusher: "alice".to_string(),
            repo_url: String::new(),
            commits,
        };
        let message = format_event(&event).unwrap();
        let first = message.find("commit message 1").unwrap();
        let second = message.find("commit message 2").unwrap();
        let third = message.find("commit message 3").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn pull_request_escapes_title() {
        let event = GithubEvent::PullRequest {
            action: "opened".to_string(),
            number: 42,
            title: "Fix *everything*".to_string(),
            author: "carol".to_string(),
            url: "https://github.com/a/b/pull/42".to_string(),
            repo_name: "a/b".to_string(),
        };
        let message = format_event(&event).unwrap();
        assert!(message.contains("Pull Request Opened"));
        assert!(message.contains("PR \\#42"));
        assert!(message.contains("Fix \\*everything\\*"));
    }

    #[test]
    fn issue_closed_uses_red_marker() {
        let event = GithubEvent::Issue {
            action: "closed".to_string(),
            number: 7,
            title: "bug".to_string(),
            author: "dave".to_string(),
            url: String::new(),
            repo_name: "a/b".to_string(),
        };
        let message = format_event(&event).unwrap();
        assert!(message.starts_with("🔴"));
        assert!(message.contains("Issue Closed"));
        assert!(message.contains("Issue \\#7"));
    }

    #[test]
    fn star_message_contains_repo_count_and_user() {
        let event = GithubEvent::Star {
            repo_name: "a/b".to_string(),
            star_count: 5,
            user: "u".to_string(),
            repo_url: "https://x".to_string(),
        };
        let message = format_event(&event).unwrap();
        assert!(message.contains("a/b"));
        assert!(message.contains("5"));
        assert!(message.contains("u"));
        assert!(message.contains("[View Repository](https://x)"));
    }

    #[test]
    fn fork_message_links_to_the_fork() {
        let event = GithubEvent::Fork {
            repo_name: "a/b".to_string(),
            fork_count: 9,
            user: "u".to_string(),
            fork_url: "https://github.com/u/b".to_string(),
        };
        let message = format_event(&event).unwrap();
        assert!(message.contains("Total forks: 9"));
        assert!(message.contains("[View Fork](https://github.com/u/b)"));
    }

    #[test]
    fn release_message_shows_name_and_tag() {
        let event = GithubEvent::Release {
            repo_name: "a/b".to_string(),
            name: "First stable".to_string(),
            tag: "v1.0".to_string(),
            author: "e".to_string(),
            url: String::new(),
        };
        let message = format_event(&event).unwrap();
        assert!(message.contains("First stable"));
        assert!(message.contains("v1\\.0"));
    }

    /// Walks a message the way Telegram's MarkdownV2 parser does: honors
    /// backslash escapes, inline code spans, bold markers, and link
    /// syntax, and fails on any other reserved character left unescaped.
    fn assert_markdownv2_clean(message: &str) {
        const RESERVED: &str = "_*[]()~`>#+-=|{}.!";
        let chars: Vec<char> = message.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '\\' => i += 2,
                '`' => {
                    i += 1;
                    while i < chars.len() && chars[i] != '`' {
                        if chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    assert!(i < chars.len(), "unterminated code span in {:?}", message);
                    i += 1;
                }
                '*' => i += 1,
                '[' => {
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    assert_eq!(
                        chars.get(i + 1),
                        Some(&'('),
                        "link text without URL in {:?}",
                        message
                    );
                    i += 2;
                    while i < chars.len() && chars[i] != ')' {
                        if chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    assert!(i < chars.len(), "unterminated link in {:?}", message);
                    i += 1;
                }
                c if RESERVED.contains(c) => {
                    panic!("unescaped reserved character {:?} in {:?}", c, message)
                }
                _ => i += 1,
            }
        }
    }

    #[test]
    fn rendered_messages_are_valid_markdownv2() {
        let commits: Vec<_> = (1..=5)
            .map(|n| CommitSummary {
                message: format!("fix (issue #{n})! v1.{n}"),
                author: "a_b.c".to_string(),
                short_sha: "abc1234".to_string(),
            })
            .collect();
        let events = vec![
            GithubEvent::Push {
                repo_name: "a/b.c".to_string(),
                branch: "feat/x`y".to_string(),
                pusher: "p_q".to_string(),
                repo_url: "https://x/a_(b)".to_string(),
                commits,
            },
            GithubEvent::PullRequest {
                action: "opened".to_string(),
                number: 42,
                title: "Fix *everything* (v2)!".to_string(),
                author: "c.d".to_string(),
                url: "https://x/pull/42".to_string(),
                repo_name: "a/b".to_string(),
            },
            GithubEvent::Issue {
                action: "reopened".to_string(),
                number: 7,
                title: "[bug] still broken...".to_string(),
                author: "d".to_string(),
                url: "https://x/issues/7".to_string(),
                repo_name: "a/b".to_string(),
            },
            GithubEvent::Star {
                repo_name: "a/b".to_string(),
                star_count: 5,
                user: "u".to_string(),
                repo_url: "https://x".to_string(),
            },
            GithubEvent::Fork {
                repo_name: "a/b".to_string(),
                fork_count: 9,
                user: "u".to_string(),
                fork_url: "https://x/u/b".to_string(),
            },
            GithubEvent::Release {
                repo_name: "a/b".to_string(),
                name: "First stable!".to_string(),
                tag: "v1.0".to_string(),
                author: "e".to_string(),
                url: "https://x/releases/v1.0".to_string(),
            },
        ];

        for event in &events {
            assert_markdownv2_clean(&format_event(event).unwrap());
        }
    }

    #[test]
    fn push_escapes_code_spans_and_link_url() {
        let event = GithubEvent::Push {
            repo_name: "a/b".to_string(),
            branch: "weird`branch".to_string(),
            pusher: "p".to_string(),
            repo_url: "https://x/a_(b)".to_string(),
            commits: vec![CommitSummary {
                message: "m".to_string(),
                author: "a".to_string(),
                short_sha: "abc`def".to_string(),
            }],
        };
        let message = format_event(&event).unwrap();
        assert!(message.contains("`weird\\`branch`"));
        assert!(message.contains("`abc\\`def`"));
        assert!(message.contains("(https://x/a_(b\\))"));
    }

    #[test]
    fn unhandled_formats_to_nothing() {
        assert_eq!(format_event(&GithubEvent::Unhandled), None);
    }

    #[test]
    fn formatting_is_deterministic() {
        let event = GithubEvent::Star {
            repo_name: "a/b".to_string(),
            star_count: 5,
            user: "u".to_string(),
            repo_url: "https://x".to_string(),
        };
        assert_eq!(format_event(&event), format_event(&event));
    }
}
