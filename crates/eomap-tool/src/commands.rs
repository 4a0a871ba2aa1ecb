use std::io::Write;
use std::path::Path;

use eomap_core::PlainText;
use eomap_map::Map;
use eomap_persist::format::{CHECKSUM_OFFSET, FormatVintage};
use eomap_persist::{load, load_file, save, save_file};

use crate::cli::{Command, USAGE};
use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::report;

/// Run one command, writing its output to `out`.
pub fn run(command: &Command, config: &ToolConfig, out: &mut dyn Write) -> Result<(), ToolError> {
    match command {
        Command::Info { path } => {
            let data = load_file(path, &PlainText)?;
            writeln!(out, "{}", report::summary_json(&data)?)?;
        }
        Command::Dump { path } => {
            let data = load_file(path, &PlainText)?;
            writeln!(out, "{}", report::dump_json(&data.map)?)?;
        }
        Command::Resave { input, output } => {
            let data = load_file(input, &PlainText)?;
            for warning in &data.warnings {
                log::warn!("{}", warning);
            }
            save_file(&data.map, output, &PlainText)?;
        }
        Command::Resize {
            input,
            output,
            width,
            height,
        } => {
            let mut map = load_file(input, &PlainText)?.map;
            let removed = map.set_dimensions(*width, *height);
            writeln!(
                out,
                "resized to {}x{}, removed {} entities",
                width,
                height,
                removed.total()
            )?;
            save_file(&map, output, &PlainText)?;
        }
        Command::New {
            output,
            width,
            height,
            name,
        } => {
            let mut map = Map::blank(*width, *height);
            config.new_map.apply(&mut map);
            if let Some(name) = name {
                map.name = name.clone();
            }
            save_file(&map, output, &PlainText)?;
        }
        Command::Check { path } => {
            check(path, out)?;
        }
        Command::Help => {
            writeln!(out, "{}", USAGE)?;
        }
    }
    Ok(())
}

/// Load a file, save it again in memory and compare.
///
/// Files in the current layout must come back byte for byte, checksum slot
/// aside. Older layouts gain sections on save, so for those the re-saved
/// bytes are loaded again and compared as maps.
fn check(path: &Path, out: &mut dyn Write) -> Result<(), ToolError> {
    let original = std::fs::read(path)?;
    let data = load(&original, &PlainText)?;
    let resaved = save(&data.map, &PlainText)?;

    if data.vintage == FormatVintage::WithSigns {
        if let Some(offset) = first_difference(&original, &resaved) {
            return Err(ToolError::CheckFailed { offset });
        }
    } else {
        let mut reloaded = load(&resaved, &PlainText)?.map;
        reloaded.revision = data.map.revision;
        if reloaded != data.map {
            return Err(ToolError::CheckFailed {
                offset: first_difference(&original, &resaved).unwrap_or(0),
            });
        }
    }

    writeln!(out, "{}: ok ({:?}, {} bytes)", path.display(), data.vintage, original.len())?;
    Ok(())
}

/// First offset at which the files differ, ignoring the checksum.
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    let checksum = CHECKSUM_OFFSET..CHECKSUM_OFFSET + 4;
    a.iter()
        .zip(b)
        .enumerate()
        .find(|(i, (x, y))| x != y && !checksum.contains(i))
        .map(|(i, _)| i)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use eomap_core::{GfxLayer, MapType, NpcSpawn};
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("emf-tool-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_new_uses_config_defaults() {
        let dir = temp_dir("new");
        let path = dir.join("new.emf");
        let config = parse_config("(new_map: (name: \"Default\", map_type: PK, music: 3))")
            .expect("config should parse");

        let command = Command::New {
            output: path.clone(),
            width: 12,
            height: 8,
            name: Some("Forest".to_string()),
        };
        run(&command, &config, &mut Vec::<u8>::new()).expect("new should succeed");

        let map = load_file(&path, &PlainText).expect("load new map").map;
        assert_eq!(map.name, "Forest");
        assert_eq!(map.map_type, MapType::PK);
        assert_eq!(map.music, 3);
        assert_eq!((map.width, map.height), (12, 8));

        std::fs::remove_dir_all(&dir).expect("remove temp dir");
    }

    #[test]
    fn test_resize_drops_entities() {
        let dir = temp_dir("resize");
        let input = dir.join("in.emf");
        let output = dir.join("out.emf");

        let mut map = Map::blank(20, 20);
        map.push_npc_spawn(NpcSpawn {
            x: 15,
            y: 15,
            ..Default::default()
        });
        map.set_gfx(GfxLayer::Ground, 2, 2, 5);
        save_file(&map, &input, &PlainText).expect("save input");

        let command = Command::Resize {
            input,
            output: output.clone(),
            width: 10,
            height: 10,
        };
        let mut out: Vec<u8> = Vec::new();
        run(&command, &ToolConfig::default(), &mut out).expect("resize should succeed");
        assert!(String::from_utf8_lossy(&out).contains("removed 1 entities"));

        let resized = load_file(&output, &PlainText).expect("load output").map;
        assert!(resized.npcs.is_empty());
        assert_eq!(resized.gfx(GfxLayer::Ground, 2, 2), Some(5));

        std::fs::remove_dir_all(&dir).expect("remove temp dir");
    }

    #[test]
    fn test_check_passes_for_saved_map() {
        let dir = temp_dir("check");
        let path = dir.join("map.emf");
        let mut map = Map::blank(5, 5);
        map.set_sign(1, 1, "Hi", "there");
        save_file(&map, &path, &PlainText).expect("save map");

        let mut out: Vec<u8> = Vec::new();
        run(&Command::Check { path }, &ToolConfig::default(), &mut out)
            .expect("check should pass");
        assert!(String::from_utf8_lossy(&out).contains("ok (WithSigns"));

        std::fs::remove_dir_all(&dir).expect("remove temp dir");
    }

    #[test]
    fn test_check_accepts_old_vintage() {
        let dir = temp_dir("check-old");
        let path = dir.join("old.emf");
        let bytes = save(&Map::blank(3, 3), &PlainText).expect("save map");
        // Drop the layer 8 row count and sign count.
        std::fs::write(&path, &bytes[..bytes.len() - 2]).expect("write old file");

        let mut out: Vec<u8> = Vec::new();
        run(&Command::Check { path }, &ToolConfig::default(), &mut out)
            .expect("check should pass");
        assert!(String::from_utf8_lossy(&out).contains("EightLayers"));

        std::fs::remove_dir_all(&dir).expect("remove temp dir");
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference(b"EMFabcdXY", b"EMFwxyzXY"), None);
        assert_eq!(first_difference(b"EMFabcdXY", b"EMFabcdXZ"), Some(8));
        assert_eq!(first_difference(b"EMFabcdX", b"EMFabcdXY"), Some(8));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let command = Command::Info {
            path: PathBuf::from("/nonexistent/dir/map.emf"),
        };
        let err = run(&command, &ToolConfig::default(), &mut Vec::<u8>::new()).expect_err("should fail");
        assert!(matches!(
            err,
            ToolError::Persist(eomap_persist::PersistError::Io(_))
        ));
    }
}
