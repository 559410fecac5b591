use crate::backend::BackendKind;
use crate::error::BackendError;

/// Loads each library once to check it is installed.
///
/// The handles are released immediately; the windowing library opens its own
/// when the session starts.
pub fn probe_libraries(kind: BackendKind, libraries: &[&'static str]) -> Result<(), BackendError> {
    for &library in libraries {
        // SAFETY: these are system client libraries whose initializers have no
        // preconditions.
        match unsafe { libloading::Library::new(library) } {
            Ok(lib) => drop(lib),
            Err(e) => {
                log::debug!("{kind}: failed to load {library}: {e}");
                return Err(BackendError::LibraryNotFound {
                    backend: kind,
                    library,
                });
            }
        }
    }

    log::trace!("{kind}: client libraries present");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_reported_by_name() {
        let err = probe_libraries(BackendKind::Wayland, &["libnabu-does-not-exist.so.0"])
            .unwrap_err();
        match err {
            BackendError::LibraryNotFound { backend, library } => {
                assert_eq!(backend, BackendKind::Wayland);
                assert_eq!(library, "libnabu-does-not-exist.so.0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_library_list_passes() {
        assert!(probe_libraries(BackendKind::X11, &[]).is_ok());
    }
}
