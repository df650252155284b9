pub mod figure;
pub mod formats;
pub mod graph;
pub mod material;
pub mod math;
pub mod mesh;
pub mod node;
pub mod render;
pub mod scene;
