/// Unit tests exercising the tracker engine through its public API
mod basic_tests;
