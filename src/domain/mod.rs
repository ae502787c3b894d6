// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing one prepared example: graphs,
// node→token alignment maps and the example tuple itself.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Host-side graph in edge-list form
pub mod graph;

// Node → token position lookup
pub mod alignment;

// The nine-field training example
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;
