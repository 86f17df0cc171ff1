//! Stand-alone thread listing served at `/threads`.
//!
//! Returns a fixed sample list and never touches an upstream.

use crate::models::{paginate, Thread};

#[derive(Debug, Clone, Default)]
pub struct ThreadsService;

impl ThreadsService {
    pub fn new() -> Self {
        Self
    }

    pub fn list_threads(&self, page: u32, limit: u32) -> Vec<Thread> {
        let samples = vec![
            Thread {
                id: "1".to_string(),
                title: "Sample Thread 1".to_string(),
            },
            Thread {
                id: "2".to_string(),
                title: "Sample Thread 2".to_string(),
            },
        ];
        paginate(samples, page, limit)
    }
}
