//! Check content for problems

use anyhow::Result;

use crate::diagnostics::Diagnostic;
use crate::Folio;

/// Load both collections and report every diagnostic
///
/// Fails when any document had to be skipped.
pub fn run(folio: &Folio) -> Result<()> {
    let diagnostics = collect(folio);

    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }

    let skipped = diagnostics.iter().filter(|d| d.is_error()).count();
    if skipped > 0 {
        anyhow::bail!("{} document(s) could not be loaded", skipped);
    }

    println!("Content OK ({} warning(s))", diagnostics.len());
    Ok(())
}

/// Diagnostics from loading projects and posts
pub fn collect(folio: &Folio) -> Vec<Diagnostic> {
    let repo = folio.repository();
    let mut diagnostics = repo.projects().diagnostics;
    diagnostics.extend(repo.posts().diagnostics);
    diagnostics
}
