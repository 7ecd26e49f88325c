use anyhow::anyhow;
use clap::{ArgAction, Parser};
use mp4atoms::{
    AtomNode, AtomTree, AtomVisitor, FourCC, ScanOptions, Walk,
    boxes::{BoxHeader, UUID},
    to_json_atom, to_json_atoms,
    util::hex_dump,
};
use std::fs::File;

#[derive(Parser, Debug)]
#[command(version, about = "MP4/3GP/MotionJPEG2000 atom tree explorer")]
struct Args {
    /// MP4/3GP/MJ2 file path
    path: String,

    /// Descend into stsd, dref and sample entries
    #[arg(long, action = ArgAction::SetTrue)]
    deep: bool,

    /// Parse unregistered atoms as containers when their payload is a clean box list
    #[arg(long, action = ArgAction::SetTrue)]
    probe_unknown: bool,

    /// Only show the atom at a dotted path (e.g. moov.udta.meta.ilst)
    #[arg(long)]
    find: Option<String>,

    /// Track number (1-based) to search with --atom
    #[arg(long, requires = "atom")]
    track: Option<usize>,

    /// Atom code to look for inside --track (e.g. stsd)
    #[arg(long, requires = "track")]
    atom: Option<String>,

    /// Hex-dump up to this many payload bytes of the selected atom
    #[arg(long, default_value_t = 0)]
    hex: u64,

    /// Limit recursion depth for the text tree
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Emit JSON instead of human-readable tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = ScanOptions {
        deep_scan: args.deep,
        probe_unknown: args.probe_unknown,
    };
    let tree = AtomTree::open(&args.path, &options)?;

    let selected = select(&tree, &args)?;

    if args.json {
        let json = match selected {
            Some(atom) => serde_json::to_string_pretty(&to_json_atom(atom))?,
            None => serde_json::to_string_pretty(&to_json_atoms(&tree))?,
        };
        println!("{json}");
        return Ok(());
    }

    println!(
        "{}: brand {} -> {:?}{}, {} track(s)",
        args.path,
        tree.major_brand().map(|b| b.to_string()).unwrap_or_default(),
        tree.metadata_style(),
        if tree.psp_brand() { " (PSP)" } else { "" },
        tree.track_count()
    );

    let mut printer = TreePrinter {
        max_depth: args.max_depth,
    };
    match selected {
        Some(atom) => {
            mp4atoms::visit::walk(std::slice::from_ref(atom), &mut printer);
            if args.hex > 0 {
                dump_payload(&args.path, atom, args.hex)?;
            }
        }
        None => {
            tree.walk(&mut printer);
        }
    }
    Ok(())
}

fn select<'a>(tree: &'a AtomTree, args: &Args) -> anyhow::Result<Option<&'a AtomNode>> {
    if let Some(path) = &args.find {
        let atom = tree
            .find_path(path)
            .ok_or_else(|| anyhow!("no atom at path '{path}'"))?;
        return Ok(Some(atom));
    }
    if let (Some(track), Some(code)) = (args.track, args.atom.as_deref()) {
        let cc = FourCC::from_str(code)
            .ok_or_else(|| anyhow!("'{code}' is not a four-character code"))?;
        let atom = tree.find_atom_in_track(track, cc).ok_or_else(|| {
            anyhow!(
                "no '{cc}' atom in track {track} (file has {} tracks)",
                tree.track_count()
            )
        })?;
        return Ok(Some(atom));
    }
    Ok(None)
}

// ---------- Human-readable tree ----------

struct TreePrinter {
    max_depth: usize,
}

impl AtomVisitor for TreePrinter {
    fn enter(&mut self, atom: &AtomNode, depth: usize) -> Walk {
        let indent = "  ".repeat(depth);
        let mut line = format!(
            "{indent}{:>8} {:>10} {} ({})",
            format!("{:#x}", atom.start()),
            atom.size(),
            display_type(&atom.hdr),
            atom.kind.as_str()
        );
        if let (Some(version), Some(flags)) = (atom.version, atom.flags) {
            line.push_str(&format!(" ver={version} flags=0x{flags:06x}"));
        }
        if let Some(lang) = atom.language_code() {
            line.push_str(&format!(" lang={lang}"));
        }
        println!("{line}");

        if depth + 1 > self.max_depth {
            Walk::SkipChildren
        } else {
            Walk::Continue
        }
    }
}

fn display_type(h: &BoxHeader) -> String {
    match h.uuid {
        Some(u) if h.typ == UUID => format!("uuid:{}", hex::encode(u)),
        _ => h.typ.to_string(),
    }
}

// ---------- Raw dump ----------

fn dump_payload(path: &str, atom: &AtomNode, limit: u64) -> anyhow::Result<()> {
    let Some((offset, len)) = atom.payload() else {
        println!("'{}' is a container; no payload to dump", atom.code());
        return Ok(());
    };
    let to_read = len.min(limit);
    let mut f = File::open(path)?;
    let data = mp4atoms::util::read_slice(&mut f, offset, to_read)?;
    print!("{}", hex_dump(&data, offset));
    Ok(())
}
