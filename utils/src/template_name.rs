use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

pub const TEMPLATE_EXTENSION: &str = "template";

/// Object name the packaging step gives an uploaded template: the MD5 of the
/// file content followed by `extension`. The body is written to a temporary
/// file first so the checksum is taken over exactly the bytes that were
/// uploaded.
pub fn get_template_file_name(template_body: &str, extension: &str) -> io::Result<String> {
    let mut temp_file = tempfile::NamedTempFile::new()?;
    temp_file.write_all(template_body.as_bytes())?;
    temp_file.flush()?;

    let checksum = file_checksum(temp_file.path())?;
    Ok(format!("{}.{}", checksum, extension))
}

pub fn file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
