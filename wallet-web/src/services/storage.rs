//! `window.localStorage` as the session record storage.

use lib_wallet::KeyValueStorage;
use web_sys::Storage;

/// [`KeyValueStorage`] over `localStorage`. Storage failures (private mode,
/// quota) are logged and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match local_storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(key, value) {
                    log::warn!("localStorage write of {} failed: {:?}", key, e);
                }
            }
            None => log::warn!("localStorage unavailable, {} not saved", key),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            if let Err(e) = storage.remove_item(key) {
                log::warn!("localStorage removal of {} failed: {:?}", key, e);
            }
        }
    }
}
