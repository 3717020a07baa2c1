pub mod registries;
