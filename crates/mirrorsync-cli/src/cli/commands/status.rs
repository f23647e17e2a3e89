//! `mirrorsync status` – show stored cursors.

use anyhow::Result;
use mirrorsync_core::state::StateStore;
use std::path::Path;

pub fn run_status(state: Option<&Path>) -> Result<()> {
    let store = StateStore::new(super::state_path(state)?);
    let st = store.load()?;
    println!("state file:   {}", store.path().display());
    match st.next_item_id {
        Some(id) => println!("next item:    {id}"),
        None => println!("next item:    - (not started)"),
    }
    match st.sync_cursor {
        Some(c) => {
            println!("listing upto: {}", c.last_timestamp.format("%Y-%m-%d %H:%M:%S"));
            for name in &c.filenames {
                println!("              {name}");
            }
        }
        None => println!("listing upto: - (not synced)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrorsync_core::item::ItemId;
    use mirrorsync_core::state::RunState;

    #[test]
    fn status_of_missing_and_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        run_status(Some(path.as_path())).unwrap();

        StateStore::new(&path)
            .save(&RunState {
                next_item_id: ItemId::new(13),
                sync_cursor: None,
            })
            .unwrap();
        run_status(Some(path.as_path())).unwrap();
    }

    #[test]
    fn status_of_corrupt_state_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(run_status(Some(path.as_path())).is_err());
    }
}
