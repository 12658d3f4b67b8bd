use colored::*;

use crate::types::{ Repository, Viewer };

pub const FULL_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

pub fn star_glyph(starred: bool) -> char {
    if starred { FULL_STAR } else { EMPTY_STAR }
}

/// One repository block: name with star glyph, then its counters
pub fn render_repo(repo: &Repository) -> String {
    let star = star_glyph(repo.viewer_has_starred).to_string();
    let commits = match repo.commit_count() {
        Some(count) => format!("{} commits", count),
        None => "no commits".to_string(),
    };

    format!(
        "{} {}\n  id: {}\n  {} open issues\n  {} open pull requests\n  {}",
        repo.name.bold(),
        star.yellow(),
        repo.id.dimmed(),
        repo.issues.total_count,
        repo.pull_requests.total_count,
        commits
    )
}

/// Greeting header followed by the repository list
pub fn render_viewer(viewer: &Viewer) -> String {
    let greeting = format!("Hello {}", viewer.display_name());
    let mut out = format!("{}\n{}\n", greeting.bold().green(), "=".repeat(50).dimmed());

    if viewer.repos.total_count == 0 || viewer.repos.nodes.is_empty() {
        out.push_str("No repositories yet.\n");
        return out;
    }

    for repo in &viewer.repos.nodes {
        out.push_str(&render_repo(repo));
        out.push_str("\n\n");
    }

    out
}
