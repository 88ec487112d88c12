//! Classification of incoming GitHub webhook payloads.
//!
//! Maps the `X-GitHub-Event` header value plus a parsed JSON payload to a
//! closed set of event variants. Events with uninteresting actions and
//! structurally unexpected payloads reduce to [`GithubEvent::Unhandled`];
//! classification never fails.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::utils::short_sha;

/// Actions of interest per event type. Anything else is ignored.
const PULL_REQUEST_ACTIONS: &[&str] = &["opened", "closed", "merged"];
const ISSUE_ACTIONS: &[&str] = &["opened", "closed", "reopened"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub message: String,
    pub author: String,
    pub short_sha: String,
}

/// One semantic category of repository event, carrying the fields its
/// formatter needs. Built once per request, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubEvent {
    Push {
        repo_name: String,
        branch: String,
        pusher: String,
        repo_url: String,
        commits: Vec<CommitSummary>,
    },
    PullRequest {
        action: String,
        number: u64,
        title: String,
        author: String,
        url: String,
        repo_name: String,
    },
    Issue {
        action: String,
        number: u64,
        title: String,
        author: String,
        url: String,
        repo_name: String,
    },
    Star {
        repo_name: String,
        star_count: u64,
        user: String,
        repo_url: String,
    },
    Fork {
        repo_name: String,
        fork_count: u64,
        user: String,
        fork_url: String,
    },
    Release {
        repo_name: String,
        name: String,
        tag: String,
        author: String,
        url: String,
    },
    Unhandled,
}

/// Classifies a webhook payload by event type.
///
/// Unknown event types are not an error; they map to `Unhandled` and are
/// logged for visibility.
pub fn classify(event_type: &str, payload: &Value) -> GithubEvent {
    match event_type {
        "push" => classify_push(payload),
        "pull_request" => classify_pull_request(payload),
        "issues" => classify_issue(payload),
        "star" => classify_star(payload),
        "fork" => classify_fork(payload),
        "release" => classify_release(payload),
        other => {
            info!("Unhandled event type: {:?}", other);
            GithubEvent::Unhandled
        }
    }
}

fn classify_push(payload: &Value) -> GithubEvent {
    let Some(commits) = payload.get("commits").and_then(|c| c.as_array()) else {
        warn!("Push payload has no commits array");
        return GithubEvent::Unhandled;
    };
    if commits.is_empty() {
        debug!("Push with no commits, skipping");
        return GithubEvent::Unhandled;
    }

    let branch_ref = field_str(payload, &["ref"]).unwrap_or("");
    let branch = branch_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(branch_ref)
        .to_string();

    let commits = commits
        .iter()
        .map(|commit| CommitSummary {
            message: field_or_unknown(commit, &["message"]),
            author: field_or_unknown(commit, &["author", "name"]),
            short_sha: short_sha(field_str(commit, &["id"]).unwrap_or("")),
        })
        .collect();

    GithubEvent::Push {
        repo_name: field_or_unknown(payload, &["repository", "full_name"]),
        branch,
        pusher: field_or_unknown(payload, &["pusher", "name"]),
        repo_url: field_url(payload, &["repository", "html_url"]),
        commits,
    }
}

fn classify_pull_request(payload: &Value) -> GithubEvent {
    let action = field_str(payload, &["action"]).unwrap_or("");
    if !PULL_REQUEST_ACTIONS.contains(&action) {
        debug!("Ignoring pull_request action {:?}", action);
        return GithubEvent::Unhandled;
    }
    let Some(pull_request) = payload.get("pull_request").filter(|v| v.is_object()) else {
        warn!("pull_request payload has no pull_request object");
        return GithubEvent::Unhandled;
    };

    GithubEvent::PullRequest {
        action: action.to_string(),
        number: field_u64(pull_request, &["number"]),
        title: field_or_unknown(pull_request, &["title"]),
        author: field_or_unknown(pull_request, &["user", "login"]),
        url: field_url(pull_request, &["html_url"]),
        repo_name: field_or_unknown(payload, &["repository", "full_name"]),
    }
}

fn classify_issue(payload: &Value) -> GithubEvent {
    let action = field_str(payload, &["action"]).unwrap_or("");
    if !ISSUE_ACTIONS.contains(&action) {
        debug!("Ignoring issues action {:?}", action);
        return GithubEvent::Unhandled;
    }
    let Some(issue) = payload.get("issue").filter(|v| v.is_object()) else {
        warn!("issues payload has no issue object");
        return GithubEvent::Unhandled;
    };

    GithubEvent::Issue {
        action: action.to_string(),
        number: field_u64(issue, &["number"]),
        title: field_or_unknown(issue, &["title"]),
        author: field_or_unknown(issue, &["user", "login"]),
        url: field_url(issue, &["html_url"]),
        repo_name: field_or_unknown(payload, &["repository", "full_name"]),
    }
}

fn classify_star(payload: &Value) -> GithubEvent {
    let action = field_str(payload, &["action"]).unwrap_or("");
    if action != "created" {
        debug!("Ignoring star action {:?}", action);
        return GithubEvent::Unhandled;
    }

    GithubEvent::Star {
        repo_name: field_or_unknown(payload, &["repository", "full_name"]),
        star_count: field_u64(payload, &["repository", "stargazers_count"]),
        user: field_or_unknown(payload, &["sender", "login"]),
        repo_url: field_url(payload, &["repository", "html_url"]),
    }
}

// Forks have no action filter; every fork is worth announcing.
fn classify_fork(payload: &Value) -> GithubEvent {
    GithubEvent::Fork {
        repo_name: field_or_unknown(payload, &["repository", "full_name"]),
        fork_count: field_u64(payload, &["repository", "forks_count"]),
        user: field_or_unknown(payload, &["sender", "login"]),
        fork_url: field_url(payload, &["forkee", "html_url"]),
    }
}

fn classify_release(payload: &Value) -> GithubEvent {
    let action = field_str(payload, &["action"]).unwrap_or("");
    if action != "published" {
        debug!("Ignoring release action {:?}", action);
        return GithubEvent::Unhandled;
    }
    let Some(release) = payload.get("release").filter(|v| v.is_object()) else {
        warn!("release payload has no release object");
        return GithubEvent::Unhandled;
    };

    let tag = field_or_unknown(release, &["tag_name"]);
    // Releases may be published without a name; fall back to the tag.
    let name = field_str(release, &["name"])
        .map(str::to_string)
        .unwrap_or_else(|| tag.clone());

    GithubEvent::Release {
        repo_name: field_or_unknown(payload, &["repository", "full_name"]),
        name,
        tag,
        author: field_or_unknown(release, &["author", "login"]),
        url: field_url(release, &["html_url"]),
    }
}

fn field_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str()
}

fn field_or_unknown(value: &Value, path: &[&str]) -> String {
    field_str(value, path).unwrap_or("Unknown").to_string()
}

fn field_url(value: &Value, path: &[&str]) -> String {
    field_str(value, path).unwrap_or("").to_string()
}

fn field_u64(value: &Value, path: &[&str]) -> u64 {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return 0,
        }
    }
    current.as_u64().unwrap_or(0)
}
