//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use car_registry::Car;

pub fn car(id: &str, price: u64) -> Car {
    Car {
        price,
        category: "sedan".into(),
        ..Car::new(id, format!("Car {id}"))
    }
}

pub fn featured(id: &str) -> Car {
    Car {
        featured: true,
        ..car(id, 0)
    }
}

pub fn ids(cars: &[Car]) -> Vec<&str> {
    cars.iter().map(|c| c.id.as_str()).collect()
}

/// Collects everything a listener receives.
#[derive(Clone, Default)]
pub struct Received<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Received<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, item: T) {
        self.items.lock().unwrap().push(item);
    }

    pub fn all(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<T> {
        self.items.lock().unwrap().last().cloned()
    }
}

/// Install a test log subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
