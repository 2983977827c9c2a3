mod checksum;

pub use checksum::{
    digests_match, md5_file_hex, md5_hex, md5_reader_hex, sha256_file_hex, sha256_hex,
    sha256_reader_hex,
};
