#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Two sentences, the boundary glued inside `home.The`.
pub const GLUED: &str = "@@100\nThey\tthey\tpphs2\nwent\tgo\tvvd\nhome.The\thome.the\tnn1\n\
                         end\tend\tnn1\n.\t.\ty\n";

/// Already clean; only gains a boundary.
pub const CLEAN: &str = "@@102\nDogs\tdog\tnn2\nbark\tbark\tvv0\n.\t.\ty\n";

/// Windows-1252 encoded `Café .`.
pub const CP1252: &[u8] = b"@@101\nCaf\xe9\tcaf\xe9\tnn1\n.\t.\ty\n";

pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directories");
    }
    fs::write(path, contents).expect("write fixture");
}

pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("reading {relative} failed: {e}"))
}

/// A small corpus laid out the way the decade archives unpack.
pub fn seed_corpus(root: &Path) {
    write_file(root, "1930s/fic_1936_100.txt", GLUED.as_bytes());
    write_file(root, "1930s/nf_1931_102.txt", CLEAN.as_bytes());
    write_file(root, "1880s/mag_1881_101.txt", CP1252);
    write_file(root, "README.md", b"not a corpus file");
}
