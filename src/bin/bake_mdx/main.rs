//! Bakes an intermediate-representation dump (JSON, as produced by a model
//! parser) into runtime asset files.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mdx_import::file_formats::modelfile::{self, encode_mesh, Deformation};
use mdx_import::{import_model, ImportOutput, ImportSettings};

mod utils;
use utils::{ensure_parent_dir_exists, file_safe_name};

#[derive(Parser, Debug)]
#[command(name = "bake_mdx", about = "Bake a parsed MDX/MDL model into runtime assets")]
struct Cli {
    /// Parsed model as JSON
    input: PathBuf,
    /// Import settings as JSON; missing fields use defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value = "assets/local")]
    out: PathBuf,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir_exists(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Directory and file name for the baked model. The model name is input data,
/// so it falls back to the input file stem and is reduced to a single safe
/// path component.
fn asset_name(model_name: &str, input: &Path) -> String {
    let name = if model_name.trim().is_empty() {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        model_name.to_string()
    };
    let name = file_safe_name(&name);
    if name.is_empty() {
        "model".to_string()
    } else {
        name
    }
}

fn bake(output: &ImportOutput, name: &str, out_dir: &Path) -> Result<()> {
    let model_dir = out_dir.join(name);
    let binary_path = model_dir.join(format!("{}.bin", name));
    let json_path = model_dir.join(format!("{}.json", name));
    let skeleton_path = model_dir.join("skeleton.json");

    let encoded = encode_mesh(&output.mesh);
    ensure_parent_dir_exists(&binary_path)?;
    let mut binary_file = File::create(&binary_path)
        .with_context(|| format!("creating {}", binary_path.display()))?;
    binary_file.write_all(&encoded.bytes)?;

    write_json(&skeleton_path, &output.skeleton)?;

    let mut animation_paths = vec![];
    for clip in &output.clips {
        let path = model_dir
            .join("animations")
            .join(format!("{}.json", file_safe_name(&clip.name)));
        write_json(&path, clip)?;
        animation_paths.push(path.to_string_lossy().into_owned());
    }

    let mut material_paths = vec![];
    for material in &output.materials {
        let path = model_dir
            .join("materials")
            .join(format!("{}.json", file_safe_name(&material.name)));
        write_json(&path, material)?;
        material_paths.push(path.to_string_lossy().into_owned());
    }

    let marker_path = if output.markers.is_empty() {
        None
    } else {
        let path = model_dir.join("markers.json");
        write_json(&path, &output.markers)?;
        Some(path.to_string_lossy().into_owned())
    };

    let model = modelfile::Model {
        submeshes: encoded.submeshes,
        material_paths,
        marker_path,
        buffer: binary_path.to_string_lossy().into_owned(),
        deformation: Deformation::Skinned {
            skeleton: skeleton_path.to_string_lossy().into_owned(),
            animations: animation_paths,
        },
        vertex_buffer_start_offset: encoded.vertex_buffer_start_offset,
        aabb: output.mesh.bounds.clone(),
        bind_poses: output.mesh.bind_poses.clone(),
    };
    write_json(&json_path, &model)?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();
    let cli = Cli::parse();

    let settings: ImportSettings = match &cli.settings {
        Some(path) => read_json(path)?,
        None => ImportSettings::default(),
    };
    let mut model: mdx_import::ir::Model = read_json(&cli.input)?;
    // material and output file names derive from the model name
    model.name = asset_name(&model.name, &cli.input);

    let output = import_model(&model, &settings)
        .with_context(|| format!("importing {}", cli.input.display()))?;
    bake(&output, &output.name, &cli.out)?;

    log::info!(
        "baked {} into {} ({} warnings)",
        output.name,
        cli.out.display(),
        output.warnings.len()
    );
    Ok(())
}
