//! Skeleton tree instantiation.
//!
//! The skeleton directory holds one file per registry artifact (plus any
//! support files). Materializing copies it to the output directory, skipping
//! excluded file names, then renders each planned artifact in place.

use crate::render::{RenderError, Renderer};
use nftspec_kernel::{MaterializePlan, RenderContext};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("skeleton directory not found: {0}")]
    SkeletonMissing(String),

    #[error("output directory already exists: {0}")]
    DestinationExists(String),

    #[error("artifact `{0}` is planned for rendering but missing from the skeleton")]
    MissingArtifact(String),

    #[error("failed to render {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: RenderError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeOutcome {
    pub copied: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub rendered: Vec<PathBuf>,
}

fn io_error(path: &Path, error: std::io::Error) -> MaterializeError {
    MaterializeError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Copy `skeleton` into `out`, skipping files whose name the plan excludes.
///
/// `out` must not exist yet. Entries are visited in sorted order.
pub fn copy_skeleton(
    skeleton: &Path,
    out: &Path,
    plan: &MaterializePlan,
) -> Result<MaterializeOutcome, MaterializeError> {
    if !skeleton.is_dir() {
        return Err(MaterializeError::SkeletonMissing(
            skeleton.display().to_string(),
        ));
    }
    if out.exists() {
        return Err(MaterializeError::DestinationExists(
            out.display().to_string(),
        ));
    }
    let mut outcome = MaterializeOutcome::default();
    copy_dir(skeleton, out, plan, &mut outcome)?;
    tracing::debug!(
        copied = outcome.copied.len(),
        skipped = outcome.skipped.len(),
        out = %out.display(),
        "skeleton copied"
    );
    Ok(outcome)
}

fn copy_dir(
    from: &Path,
    to: &Path,
    plan: &MaterializePlan,
    outcome: &mut MaterializeOutcome,
) -> Result<(), MaterializeError> {
    fs::create_dir_all(to).map_err(|e| io_error(to, e))?;

    let mut entries = fs::read_dir(from)
        .map_err(|e| io_error(from, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_error(from, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_error(&source, e))?;
        if file_type.is_dir() {
            copy_dir(&source, &target, plan, outcome)?;
            continue;
        }
        let excluded = entry
            .file_name()
            .to_str()
            .is_some_and(|name| plan.is_excluded(name));
        if excluded {
            outcome.skipped.push(source);
            continue;
        }
        fs::copy(&source, &target).map_err(|e| io_error(&target, e))?;
        outcome.copied.push(target);
    }
    Ok(())
}

/// Copy the skeleton, then render every planned artifact in place.
///
/// Artifacts are looked up at the top level of `out`; same-named files in
/// nested directories are copied verbatim.
pub fn materialize(
    skeleton: &Path,
    out: &Path,
    plan: &MaterializePlan,
    context: &RenderContext,
    renderer: &dyn Renderer,
) -> Result<MaterializeOutcome, MaterializeError> {
    let mut outcome = copy_skeleton(skeleton, out, plan)?;
    let values = context.values();

    for artifact in &plan.rendered {
        let path = out.join(artifact);
        if !outcome.copied.contains(&path) {
            return Err(MaterializeError::MissingArtifact(artifact.clone()));
        }
        let template = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let rendered =
            renderer
                .render(&template, &values)
                .map_err(|source| MaterializeError::Render {
                    path: path.display().to_string(),
                    source,
                })?;
        fs::write(&path, rendered).map_err(|e| io_error(&path, e))?;
        tracing::debug!(artifact = %artifact, "artifact rendered");
        outcome.rendered.push(path);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PlaceholderRenderer;
    use nftspec_kernel::{SpecificationTree, compile};
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "nftspec-emit-{prefix}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&path).expect("temp dir should be created");
            Self { path }
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    fn write_skeleton(root: &Path) {
        let files = [
            ("ERC721.sol", "contract ERC721 {}\n"),
            ("IERC721.sol", "interface IERC721 {}\n"),
            ("Ownable.sol", "contract Ownable {}\n"),
            (
                "ERC721Base.sol",
                "{{ base_imports }}contract ERC721Base is {{ base_extensions }} {}\n",
            ),
            (
                "ERC721Core.sol",
                "{{ core_imports }}contract ERC721Core is {{ core_extensions }} {}\n",
            ),
            (
                "ERC721BaseExtend.sol",
                "contract ERC721BaseExtend {\n    {{ fields }}\n}\n",
            ),
            (
                "ERC721BaseBurnable.sol",
                "function burn(uint256 tokenId) public {{ modifier.burn }} {}\n",
            ),
            ("ERC721BaseSupply.sol", "contract ERC721BaseSupply {}\n"),
        ];
        for (name, body) in files {
            fs::write(root.join(name), body).expect("skeleton file should be written");
        }
        let nested = root.join("lib");
        fs::create_dir_all(&nested).expect("nested dir");
        fs::write(nested.join("README.md"), "support file\n").expect("nested file");
    }

    fn compile_text(text: &str) -> nftspec_kernel::Compilation {
        compile(SpecificationTree::from_toml_str(text).expect("tree should parse"))
            .expect("tree should compile")
    }

    #[test]
    fn materialize_skips_unused_and_renders_used() {
        let dir = TempDirGuard::new("render");
        let skeleton = dir.path.join("skeleton");
        fs::create_dir_all(&skeleton).expect("skeleton dir");
        write_skeleton(&skeleton);
        let out = dir.path.join("out");

        let compilation = compile_text(
            r#"
[[field]]
name = "count"
type = "uint"
size = 16
"#,
        );
        let outcome = materialize(
            &skeleton,
            &out,
            &compilation.plan,
            &compilation.context,
            &PlaceholderRenderer,
        )
        .expect("materialize");

        assert!(!out.join("Ownable.sol").exists());
        assert!(!out.join("ERC721BaseBurnable.sol").exists());
        assert!(out.join("IERC721.sol").exists());
        assert!(out.join("lib/README.md").exists());
        assert_eq!(outcome.rendered.len(), 3);

        let extend = fs::read_to_string(out.join("ERC721BaseExtend.sol")).expect("extend");
        assert_eq!(
            extend,
            "contract ERC721BaseExtend {\n    uint16 public count;\n}\n"
        );
        let core = fs::read_to_string(out.join("ERC721Core.sol")).expect("core");
        insta::assert_snapshot!(core.trim_end(), @r#"
        import "./ERC721Base.sol";
        import "./ERC721BaseExtend.sol";
        contract ERC721Core is ERC721Base, ERC721BaseExtend {}
        "#);
    }

    #[test]
    fn used_modifier_lands_in_function_signature() {
        let dir = TempDirGuard::new("modifier");
        let skeleton = dir.path.join("skeleton");
        fs::create_dir_all(&skeleton).expect("skeleton dir");
        write_skeleton(&skeleton);
        let out = dir.path.join("out");

        let compilation = compile_text(
            "[[include]]\nmodule = \"burn\"\n[[modify]]\nfunction = \"burn\"\nmodifier = \"onlyTokenOwner\"\n",
        );
        materialize(
            &skeleton,
            &out,
            &compilation.plan,
            &compilation.context,
            &PlaceholderRenderer,
        )
        .expect("materialize");

        let burn = fs::read_to_string(out.join("ERC721BaseBurnable.sol")).expect("burn");
        assert_eq!(
            burn,
            "function burn(uint256 tokenId) public onlyTokenOwner(tokenId) {}\n"
        );
        assert!(out.join("ERC721BaseSupply.sol").exists());
    }

    #[test]
    fn nested_namesakes_do_not_shadow_artifacts() {
        let dir = TempDirGuard::new("namesake");
        let skeleton = dir.path.join("skeleton");
        fs::create_dir_all(&skeleton).expect("skeleton dir");
        write_skeleton(&skeleton);
        let vendor = skeleton.join("vendor");
        fs::create_dir_all(&vendor).expect("vendor dir");
        fs::write(vendor.join("ERC721Core.sol"), "// vendored {{ untouched }}\n")
            .expect("vendored file");
        let out = dir.path.join("out");

        let compilation = compile_text("");
        let outcome = materialize(
            &skeleton,
            &out,
            &compilation.plan,
            &compilation.context,
            &PlaceholderRenderer,
        )
        .expect("materialize");

        assert!(outcome.rendered.contains(&out.join("ERC721Core.sol")));
        assert!(!outcome.rendered.contains(&out.join("vendor/ERC721Core.sol")));
        let core = fs::read_to_string(out.join("ERC721Core.sol")).expect("core");
        assert!(core.contains("contract ERC721Core is ERC721Base {}"));
        let vendored =
            fs::read_to_string(out.join("vendor/ERC721Core.sol")).expect("vendored copy");
        assert_eq!(vendored, "// vendored {{ untouched }}\n");
    }

    #[test]
    fn missing_planned_artifact_is_an_error() {
        let dir = TempDirGuard::new("missing");
        let skeleton = dir.path.join("skeleton");
        fs::create_dir_all(&skeleton).expect("skeleton dir");
        write_skeleton(&skeleton);

        let compilation = compile_text("[[include]]\nmodule = \"royalty\"\n");
        let error = materialize(
            &skeleton,
            &dir.path.join("out"),
            &compilation.plan,
            &compilation.context,
            &PlaceholderRenderer,
        )
        .expect_err("royalty skeleton is absent");
        assert!(matches!(
            error,
            MaterializeError::MissingArtifact(ref name) if name == "ERC721BaseRoyalty.sol"
        ));
    }

    #[test]
    fn existing_destination_is_refused() {
        let dir = TempDirGuard::new("exists");
        let skeleton = dir.path.join("skeleton");
        fs::create_dir_all(&skeleton).expect("skeleton dir");
        let out = dir.path.join("out");
        fs::create_dir_all(&out).expect("out dir");

        let error = copy_skeleton(&skeleton, &out, &MaterializePlan::default())
            .expect_err("existing destination should fail");
        assert!(matches!(error, MaterializeError::DestinationExists(_)));
    }
}
