pub mod priority;
