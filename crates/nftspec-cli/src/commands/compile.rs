use crate::support::{confirm_overwrite, join_or_none, yes_no};
use nftspec_emit::{MaterializeOutcome, PlaceholderRenderer, materialize};
use nftspec_kernel::{Compilation, SpecificationTree, compile};
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct Args {
    pub spec: String,
    pub skeleton: String,
    pub out: String,
    pub yes: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let tree = SpecificationTree::load(&args.spec).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let compilation = compile(tree).unwrap_or_else(|e| {
        if args.json {
            let payload = json!({
                "action": "compile",
                "spec": args.spec,
                "result": "rejected",
                "code": e.code(),
                "message": e.to_string(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).expect("json serialization")
            );
        }
        eprintln!("error[{}]: {e}", e.code());
        std::process::exit(1);
    });

    let out = PathBuf::from(&args.out);
    let replaced = out.exists();
    if replaced && !args.yes && !confirm_overwrite(&out, &mut io::stdin().lock()) {
        print_aborted(&args, &out);
        return;
    }

    // Build next to `out`; the previous output is replaced only after every
    // artifact rendered.
    let staging = staging_dir(&out);
    if staging.exists() {
        remove_dir_or_exit(&staging);
    }
    let skeleton = PathBuf::from(&args.skeleton);
    let outcome = materialize(
        &skeleton,
        &staging,
        &compilation.plan,
        &compilation.context,
        &PlaceholderRenderer,
    )
    .unwrap_or_else(|e| {
        let _ = fs::remove_dir_all(&staging);
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if replaced {
        tracing::info!(out = %out.display(), "replacing existing output directory");
        remove_dir_or_exit(&out);
    }
    fs::rename(&staging, &out).unwrap_or_else(|e| {
        eprintln!(
            "error: failed to move {} to {}: {e}",
            staging.display(),
            out.display()
        );
        std::process::exit(1);
    });

    if args.json {
        print_json(&args, &compilation, &outcome, replaced);
    } else {
        print_text(&args, &compilation, &outcome, replaced);
    }
}

fn staging_dir(out: &Path) -> PathBuf {
    let name = out
        .file_name()
        .map_or_else(|| "output".to_string(), |name| name.to_string_lossy().into_owned());
    out.with_file_name(format!(".{name}.partial"))
}

fn remove_dir_or_exit(dir: &Path) {
    fs::remove_dir_all(dir).unwrap_or_else(|e| {
        eprintln!("error: failed to remove {}: {e}", dir.display());
        std::process::exit(1);
    });
}

fn print_aborted(args: &Args, out: &Path) {
    if args.json {
        let payload = json!({
            "action": "compile",
            "spec": args.spec,
            "result": "aborted",
            "out": out.display().to_string(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("aborted");
    }
}

fn print_json(
    args: &Args,
    compilation: &Compilation,
    outcome: &MaterializeOutcome,
    replaced: bool,
) {
    let payload = json!({
        "action": "compile",
        "spec": args.spec,
        "result": "accepted",
        "out": args.out,
        "replacedExisting": replaced,
        "traits": compilation.registry.traits.used_ids(),
        "modules": compilation.registry.modules.used_ids(),
        "excluded": compilation.plan.excluded,
        "rendered": compilation.plan.rendered,
        "copiedCount": outcome.copied.len(),
        "context": compilation.context,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).expect("json serialization")
    );
}

fn print_text(
    args: &Args,
    compilation: &Compilation,
    outcome: &MaterializeOutcome,
    replaced: bool,
) {
    println!("nftspec {}", args.spec);
    println!();
    println!("  Output: {}", args.out);
    println!("  Replaced existing: {}", yes_no(replaced));
    println!(
        "  Traits: {}",
        join_or_none(&compilation.registry.traits.used_ids())
    );
    println!(
        "  Modules: {}",
        join_or_none(&compilation.registry.modules.used_ids())
    );
    println!("  Core: {}", join_or_none(&compilation.context.core_extensions));
    println!("  Files copied: {}", outcome.copied.len());
    println!("  Files excluded: {}", compilation.plan.excluded.len());
    println!("  Rendered: {}", join_or_none(&compilation.plan.rendered));
}
