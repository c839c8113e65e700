//! Clean the public directory

use anyhow::Result;

use crate::builder::Builder;
use crate::Folio;

/// Remove the build output
pub fn run(folio: &Folio) -> Result<()> {
    Builder::new(folio).clean()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_output() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        fs::create_dir_all(folio.public_dir.join("nested")).unwrap();
        fs::write(folio.public_dir.join("nested/index.html"), "x").unwrap();

        run(&folio).unwrap();
        assert!(!folio.public_dir.exists());

        // Cleaning twice is fine
        run(&folio).unwrap();
    }
}
