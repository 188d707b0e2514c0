use crate::models::{FileEntry, LargestFile, StructureMetrics};

const BYTES_PER_KB: f64 = 1024.0;

/// Size and layout figures over the sampled listing. Zero-byte entries
/// (directories, empty files) are left out of the size figures.
pub fn analyze_structure(files: &[FileEntry]) -> StructureMetrics {
    let sized: Vec<&FileEntry> = files.iter().filter(|f| f.size_bytes > 0).collect();

    let average_file_size_kb = if sized.is_empty() {
        0.0
    } else {
        let total: u64 = sized.iter().map(|f| f.size_bytes).sum();
        total as f64 / sized.len() as f64 / BYTES_PER_KB
    };

    // First of equally large files wins
    let largest_file = sized
        .iter()
        .fold(None::<&FileEntry>, |best, f| match best {
            Some(b) if b.size_bytes >= f.size_bytes => Some(b),
            _ => Some(*f),
        })
        .map(|f| LargestFile {
            name: f.name.clone(),
            size_kb: f.size_bytes as f64 / BYTES_PER_KB,
        });

    let max_directory_depth = files
        .iter()
        .map(|f| {
            let path = if f.path.is_empty() { &f.name } else { &f.path };
            path.split('/').filter(|s| !s.is_empty()).count()
        })
        .max()
        .unwrap_or(0);

    StructureMetrics {
        average_file_size_kb,
        largest_file,
        max_directory_depth,
    }
}
