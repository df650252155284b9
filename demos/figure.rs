use std::error::Error;
use std::fs;
use std::path::PathBuf;

use armature::figure::{build_figure, FigureAnimator, FigureConfig};
use armature::formats::config::parse_figure_config;
use armature::formats::scene::parse_scene;
use armature::material::{Drawable, MeshLibrary, Model, Primitive};
use armature::mesh::Mesh;
use armature::render::{DrawSubmission, RenderContext};
use armature::scene::Scene;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[arg(short, long, default_value_t = 3, help = "Number of frames to step")]
	frames: u32,
	#[arg(long, default_value_t = 1.0 / 60.0, help = "Seconds per frame")]
	dt: f32,
	#[arg(long, help = "JSON scene description to use instead of the built-in robot")]
	scene: Option<PathBuf>,
	#[arg(long, help = "JSON figure config")]
	config: Option<PathBuf>,
	#[arg(short, long, help = "Log every draw, not just the frame summary")]
	verbose: bool,
}

/// Prints what a real backend would draw.
struct LogRenderer<'a> {
	meshes: &'a MeshLibrary,
	draws: usize,
	triangles: usize,
}

impl RenderContext<Drawable> for LogRenderer<'_> {
	fn submit(&mut self, draw: DrawSubmission<'_, Drawable>) {
		let model = self.meshes.resolve(draw.payload.primitive);
		let triangles = model.map(Model::num_triangles);
		let (x, y, z) = draw.model.w_axis.truncate().into();
		debug!(
			"{} {:?} at ({x:.2}, {y:.2}, {z:.2}), {}",
			draw.name,
			draw.payload.primitive,
			match triangles {
				Some(n) => format!("{n} triangles"),
				None => "backend geometry".to_owned(),
			}
		);

		match model {
			Some(model) => {
				for submesh in &model.submeshes {
					let material = submesh.material_for(&draw.payload.material);
					debug!(
						"  submesh: {} triangles, textured: {}",
						submesh.mesh.num_triangles(),
						material.texture.is_some() && submesh.mesh.has_tex_coords
					);
				}
				self.draws += model.submeshes.len();
			}
			None => self.draws += 1,
		}
		self.triangles += triangles.unwrap_or(0);
	}
}

fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
	tracing_subscriber::registry().with(fmt::layer()).with(level).init();

	let config = match cli.config {
		Some(path) => parse_figure_config(&fs::read_to_string(path)?)?,
		None => FigureConfig::default(),
	};

	let graph = match cli.scene {
		Some(path) => {
			info!("Loading scene from {}", path.display());
			parse_scene(&fs::read_to_string(path)?)?
		}
		None => build_figure(&config)?,
	};
	info!("Scene has {} nodes:\n{graph}", graph.len());

	let mut meshes = MeshLibrary::new();
	// stand-in for the plane model, which is not shipped
	let mut plane = Mesh::cube();
	plane.generate_vertex_normals()?;
	meshes.insert(plane);

	let animator = FigureAnimator::bind(&graph, config);
	let mut scene = Scene::new(graph, animator);

	for _ in 0..cli.frames {
		let mut renderer = LogRenderer {
			meshes: &meshes,
			draws: 0,
			triangles: 0,
		};
		scene.frame(cli.dt, &mut renderer);

		info!(
			"Frame {}: rotation {:.1}°, {} draws, {} CPU triangles",
			scene.frame_count(),
			scene.animator().rotation_angle(),
			renderer.draws,
			renderer.triangles
		);
	}

	let teapots = scene
		.graph()
		.iter()
		.filter(|(_, node)| node.payload().is_some_and(|d| d.primitive == Primitive::Teapot))
		.count();
	info!("Done, {teapots} teapots left for the backend to tessellate");

	Ok(())
}
