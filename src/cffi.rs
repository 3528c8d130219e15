/*
 * @file cffi.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * C foreign function interface.
 */

use crate::{BuildOptions,Mphf};
use core::ptr::NonNull;
use core::slice::{from_raw_parts,from_raw_parts_mut};
use std::ffi::CStr;
use std::os::raw::c_char;
use tracing::warn;

/// Returned by `bbhash_mphf_query` when no level places the key
pub const BBHASH_NOT_FOUND: u64 = 0xFFFF_FFFF_FFFF_FFFF;

unsafe fn ptr_to_path<'a>(path: *const c_char) -> Option<&'a str> {
    if path.is_null() { return None; }
    CStr::from_ptr(path).to_str().ok()
}

#[no_mangle]
/// Build an MPHF over `len` unique keys.  Return NULL on failure
pub unsafe extern "C" fn bbhash_mphf_create(data: *const u64, len: usize, gamma: f64, verbose: bool)
        -> *mut Mphf {
    let keys = if len == 0 || data.is_null() { &[][..] } else { from_raw_parts(data, len) };
    let options = BuildOptions { gamma, verbose, ..Default::default() };
    match Mphf::build(keys, &options) {
        Ok(mphf) => Box::into_raw(Box::new(mphf)),
        Err(err) => {
            warn!(%err, "bbhash_mphf_create failed");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Look up a key.  Returns BBHASH_NOT_FOUND if no level places it
pub unsafe extern "C" fn bbhash_mphf_query(ptr: NonNull<Mphf>, key: u64) -> u64 {
    ptr.as_ref().query(key).unwrap_or(BBHASH_NOT_FOUND)
}

#[no_mangle]
/// Number of keys the MPHF was built over
pub unsafe extern "C" fn bbhash_num_keys(ptr: NonNull<Mphf>) -> u64 {
    ptr.as_ref().num_keys()
}

#[no_mangle]
/// Storage used by the MPHF, in bits
pub unsafe extern "C" fn bbhash_size_in_bits(ptr: NonNull<Mphf>) -> usize {
    ptr.as_ref().size_in_bits()
}

#[no_mangle]
/// Save to a file.  Return true on success
pub unsafe extern "C" fn bbhash_mphf_save(ptr: NonNull<Mphf>, path: *const c_char) -> bool {
    let path = match ptr_to_path(path) { Some(p) => p, None => return false };
    match ptr.as_ref().save(path) {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, path, "bbhash_mphf_save failed");
            false
        }
    }
}

#[no_mangle]
/// Load from a file.  Return NULL on failure
pub unsafe extern "C" fn bbhash_mphf_load(path: *const c_char) -> *mut Mphf {
    let path = match ptr_to_path(path) { Some(p) => p, None => return std::ptr::null_mut() };
    match Mphf::load(path) {
        Ok(mphf) => Box::into_raw(Box::new(mphf)),
        Err(err) => {
            warn!(%err, path, "bbhash_mphf_load failed");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Encode to output_buf, if it's big enough.  Return the serialized size of the object, in bytes,
/// or 0 if encoding failed.
pub unsafe extern "C" fn bbhash_mphf_encode(
    ptr: NonNull<Mphf>,
    output_buf: *mut u8,
    output_buf_size: usize
) -> usize {
    let mphf = ptr.as_ref();
    let required_size = mphf.serialized_size();
    if required_size <= output_buf_size && !output_buf.is_null() {
        match mphf.to_bytes() {
            Ok(bytes) => from_raw_parts_mut(output_buf, required_size).copy_from_slice(&bytes),
            Err(err) => {
                warn!(%err, "bbhash_mphf_encode failed");
                return 0;
            }
        }
    }
    required_size
}

#[no_mangle]
/// Decode from a buffer produced by bbhash_mphf_encode.  Return NULL on failure
pub unsafe extern "C" fn bbhash_mphf_decode(buf: *const u8, buf_size: usize) -> *mut Mphf {
    if buf.is_null() { return std::ptr::null_mut(); }
    match Mphf::from_bytes(from_raw_parts(buf, buf_size)) {
        Ok(mphf) => Box::into_raw(Box::new(mphf)),
        Err(err) => {
            warn!(%err, buf_size, "bbhash_mphf_decode failed");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
/// Destroy and free an MPHF
pub unsafe extern "C" fn bbhash_free(ptr: *mut Mphf) {
    if !ptr.is_null() { drop(Box::from_raw(ptr)); }
}

#[cfg(test)]
mod tests {
    use crate::cffi::*;
    use std::ffi::CString;
    use std::ptr::NonNull;

    #[test]
    fn test_create_query_free() {
        let keys = [5u64, 1, 10, 2, 8, 100];
        unsafe {
            let raw = bbhash_mphf_create(keys.as_ptr(), keys.len(), 2.0, false);
            let ptr = NonNull::new(raw).unwrap();
            assert_eq!(bbhash_num_keys(ptr), 6);
            let mut seen = [false; 6];
            for &k in &keys {
                let idx = bbhash_mphf_query(ptr, k);
                assert!(idx < 6);
                assert!(!seen[idx as usize]);
                seen[idx as usize] = true;
            }
            assert!(bbhash_size_in_bits(ptr) > 0);

            let size = bbhash_mphf_encode(ptr, std::ptr::null_mut(), 0);
            let mut buf = vec![0u8; size];
            assert_eq!(bbhash_mphf_encode(ptr, buf.as_mut_ptr(), buf.len()), size);
            let copy = NonNull::new(bbhash_mphf_decode(buf.as_ptr(), buf.len())).unwrap();
            for &k in &keys {
                assert_eq!(bbhash_mphf_query(copy, k), bbhash_mphf_query(ptr, k));
            }
            bbhash_free(copy.as_ptr());
            bbhash_free(raw);
        }
    }

    #[test]
    fn test_save_load() {
        let keys : Vec<u64> = (1..=500).collect();
        let dir = tempfile::tempdir().unwrap();
        let path = CString::new(dir.path().join("c.bin").to_str().unwrap()).unwrap();
        unsafe {
            let ptr = NonNull::new(bbhash_mphf_create(keys.as_ptr(), keys.len(), 1.0, false)).unwrap();
            assert!(bbhash_mphf_save(ptr, path.as_ptr()));
            let loaded = NonNull::new(bbhash_mphf_load(path.as_ptr())).unwrap();
            for &k in &keys {
                assert_eq!(bbhash_mphf_query(loaded, k), bbhash_mphf_query(ptr, k));
            }
            bbhash_free(loaded.as_ptr());
            bbhash_free(ptr.as_ptr());

            let missing = CString::new(dir.path().join("missing.bin").to_str().unwrap()).unwrap();
            assert!(bbhash_mphf_load(missing.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let keys = [1u64, 2, 3];
        unsafe {
            let ptr = NonNull::new(bbhash_mphf_create(keys.as_ptr(), keys.len(), 2.0, false)).unwrap();
            let size = bbhash_mphf_encode(ptr, std::ptr::null_mut(), 0);
            assert!(size > 0);
            let mut buf = vec![0u8; size];
            assert_eq!(bbhash_mphf_encode(ptr, buf.as_mut_ptr(), buf.len()), size);
            bbhash_free(ptr.as_ptr());

            assert!(bbhash_mphf_decode(buf.as_ptr(), buf.len() - 1).is_null());
            buf[0] ^= 0xff;
            assert!(bbhash_mphf_decode(buf.as_ptr(), buf.len()).is_null());
            assert!(bbhash_mphf_decode(std::ptr::null(), 0).is_null());
        }
    }

    #[test]
    fn test_bad_gamma_is_null() {
        let keys = [1u64, 2, 3];
        unsafe {
            assert!(bbhash_mphf_create(keys.as_ptr(), keys.len(), 0.0, false).is_null());
        }
    }
}
