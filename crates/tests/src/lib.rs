pub mod fixtures;

#[cfg(test)]
mod health_tests;
#[cfg(test)]
mod session_tests;
