pub mod animator;
