pub mod schedule;

#[cfg(test)]
mod tests;
