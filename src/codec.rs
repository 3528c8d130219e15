/*
 * @file codec.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Binary format for Mphf.  All integers are little-endian u64:
 *
 *   "BBH1" num_keys num_levels
 *   per level: seed offset bit_count words[ceil(bit_count/64)]
 *              num_checkpoints checkpoints[num_checkpoints]
 *
 * Integers are written as raw bytes rather than through the bincode
 * config, so the layout is the same whatever config the caller uses.
 */

use crate::error::{Error,BAD_MAGIC};
use crate::level::Level;
use crate::mphf::Mphf;
use crate::succinct::bitvec::{BitVector,words_for};
use crate::succinct::rank::{RankIndex,checkpoints_for};
use bincode::{Encode,Decode};
use bincode::config::{self,Config,Configuration,LittleEndian,Fixint,NoLimit};
use bincode::de::{Decoder,read::Reader};
use bincode::enc::{Encoder,EncoderImpl,write::Writer};
use bincode::error::{DecodeError,EncodeError};
use std::fs::File;
use std::io::{BufReader,BufWriter,Read,Write};
use std::path::Path;
use tracing::debug;

/** File magic; changes with any incompatible format change. */
pub const MAGIC : [u8; 4] = *b"BBH1";

/**
 * Bincode config for this crate: fixed-width little-endian integers,
 * so that nothing gets recoded in varint format.
 */
pub const STD_BINCODE_CONFIG : Configuration<LittleEndian, Fixint, NoLimit> =
    config::standard().with_little_endian().with_fixed_int_encoding();

/** Largest preallocation made on the strength of a length read from input */
const MAX_PREALLOC : usize = 1 << 16;

/** Writer that only counts bytes */
struct SizeOnlyWriter<'a> {
    bytes_written: &'a mut usize
}

impl<'a> Writer for SizeOnlyWriter<'a> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        *self.bytes_written += bytes.len();
        Ok(())
    }
}

/** Return the serialized size of an `Encode` object without materializing it. */
pub fn serialized_size<T:Encode,C:Config>(obj:&T, config:C) -> Result<usize, EncodeError> {
    let mut size = 0usize;
    let mut ei = EncoderImpl::new(SizeOnlyWriter { bytes_written: &mut size }, config);
    obj.encode(&mut ei)?;
    Ok(size)
}

fn write_u64<E:Encoder>(encoder:&mut E, x:u64) -> Result<(), EncodeError> {
    encoder.writer().write(&x.to_le_bytes())
}

fn read_u64<D:Decoder>(decoder:&mut D) -> Result<u64, DecodeError> {
    let mut bytes = [0u8; 8];
    decoder.reader().read(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

fn read_len<D:Decoder>(decoder:&mut D) -> Result<usize, DecodeError> {
    usize::try_from(read_u64(decoder)?).map_err(|_| DecodeError::Other("length does not fit in memory"))
}

/** Read `n` words without trusting `n` for the allocation size */
fn read_words<D:Decoder>(decoder:&mut D, n:usize) -> Result<Vec<u64>, DecodeError> {
    let mut ret = Vec::with_capacity(n.min(MAX_PREALLOC));
    for _ in 0..n { ret.push(read_u64(decoder)?); }
    Ok(ret)
}

impl Encode for Level {
    fn encode<E:Encoder>(&self, encoder:&mut E) -> Result<(), EncodeError> {
        write_u64(encoder, self.seed)?;
        write_u64(encoder, self.offset)?;
        write_u64(encoder, self.bits.len() as u64)?;
        for &w in self.bits.words() { write_u64(encoder, w)?; }
        write_u64(encoder, self.ranks.len() as u64)?;
        for &c in self.ranks.checkpoints() { write_u64(encoder, c)?; }
        Ok(())
    }
}

impl <Context> Decode<Context> for Level {
    fn decode<D:Decoder<Context=Context>>(decoder:&mut D) -> Result<Self, DecodeError> {
        let seed = read_u64(decoder)?;
        let offset = read_u64(decoder)?;
        let bit_count = read_len(decoder)?;
        if bit_count == 0 { return Err(DecodeError::Other("level with no slots")); }
        let words = read_words(decoder, words_for(bit_count))?;
        let bits = BitVector::from_words(bit_count, words)
            .ok_or(DecodeError::Other("bits set past the end of a level"))?;

        let num_checkpoints = read_len(decoder)?;
        if num_checkpoints != checkpoints_for(bit_count) {
            return Err(DecodeError::Other("wrong number of rank checkpoints"));
        }
        let ranks = RankIndex::from_checkpoints(read_words(decoder, num_checkpoints)?);
        if ranks != RankIndex::build(&bits) {
            return Err(DecodeError::Other("rank checkpoints do not match level"));
        }
        Ok(Level { seed, offset, bits, ranks })
    }
}

impl Encode for Mphf {
    fn encode<E:Encoder>(&self, encoder:&mut E) -> Result<(), EncodeError> {
        encoder.writer().write(&MAGIC)?;
        write_u64(encoder, self.num_keys)?;
        write_u64(encoder, self.levels.len() as u64)?;
        for level in &self.levels { level.encode(encoder)?; }
        Ok(())
    }
}

impl <Context> Decode<Context> for Mphf {
    fn decode<D:Decoder<Context=Context>>(decoder:&mut D) -> Result<Self, DecodeError> {
        let mut magic = [0u8; 4];
        decoder.reader().read(&mut magic)?;
        if magic != MAGIC { return Err(DecodeError::Other(BAD_MAGIC)); }

        let num_keys = read_u64(decoder)?;
        let num_levels = read_len(decoder)?;
        let mut levels = Vec::with_capacity(num_levels.min(MAX_PREALLOC));
        let mut placed = 0u64;
        for _ in 0..num_levels {
            let level = Level::decode(decoder)?;
            if level.offset != placed {
                return Err(DecodeError::Other("level offsets are not cumulative"));
            }
            placed += level.placed();
            levels.push(level);
        }
        if placed != num_keys {
            return Err(DecodeError::Other("levels do not place every key"));
        }
        Ok(Mphf { num_keys, levels })
    }
}

impl Mphf {
    /** Exact length of the serialized form, in bytes */
    pub fn serialized_size(&self) -> usize {
        serialized_size(self, STD_BINCODE_CONFIG).unwrap_or(0)
    }

    /** Serialize to a byte vector */
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(bincode::encode_to_vec(self, STD_BINCODE_CONFIG)?)
    }

    /** Deserialize from exactly the bytes produced by `to_bytes` */
    pub fn from_bytes(bytes:&[u8]) -> Result<Mphf, Error> {
        let (ret, read) : (Mphf, usize) = bincode::decode_from_slice(bytes, STD_BINCODE_CONFIG)?;
        if read != bytes.len() { return Err(Error::Corrupt("trailing bytes after MPHF")); }
        Ok(ret)
    }

    /** Serialize into a writer */
    pub fn write_to<W:Write>(&self, writer:&mut W) -> Result<usize, Error> {
        Ok(bincode::encode_into_std_write(self, writer, STD_BINCODE_CONFIG)?)
    }

    /** Deserialize from a reader, consuming exactly one MPHF */
    pub fn read_from<R:Read>(reader:&mut R) -> Result<Mphf, Error> {
        Ok(bincode::decode_from_std_read(reader, STD_BINCODE_CONFIG)?)
    }

    /**
     * Save to `path`.  On error the file may be left partially written.
     */
    pub fn save<P:AsRef<Path>>(&self, path:P) -> Result<(), Error> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        let written = self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), bytes = written, levels = self.levels.len(), "saved MPHF");
        Ok(())
    }

    /** Load from a file written by `save` */
    pub fn load<P:AsRef<Path>>(path:P) -> Result<Mphf, Error> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let ret = Self::read_from(&mut reader)?;
        debug!(path = %path.display(), keys = ret.num_keys, levels = ret.levels.len(), "loaded MPHF");
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::{MAGIC,STD_BINCODE_CONFIG,serialized_size};
    use crate::error::Error;
    use crate::keys::random_unique_keys;
    use crate::mphf::Mphf;
    use rand::{thread_rng,Rng};
    use std::fs;

    fn three_level_mphf() -> (Vec<u64>, Mphf) {
        let mut rng = thread_rng();
        let keys = random_unique_keys(&mut rng, 1000);
        let mphf = Mphf::with_gamma(&keys, 1.0).unwrap();
        assert!(mphf.num_levels() >= 3);
        (keys, mphf)
    }

    #[test]
    fn test_bytes_round_trip() {
        let (keys, mphf) = three_level_mphf();
        let bytes = mphf.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &MAGIC);
        assert_eq!(bytes.len(), mphf.serialized_size());

        let expected_len = 20 + mphf.levels().iter().map(|l|
            32 + 8*(l.bits().words().len() + l.ranks().len())
        ).sum::<usize>();
        assert_eq!(bytes.len(), expected_len);

        let loaded = Mphf::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, mphf);
        assert_eq!(loaded.size_in_bits(), mphf.size_in_bits());
        for &k in &keys {
            assert_eq!(loaded.query(k), mphf.query(k));
        }
    }

    #[test]
    fn test_layout_is_little_endian() {
        let mphf = Mphf::with_gamma(&[5, 1, 10, 2, 8, 100], 2.0).unwrap();
        let bytes = mphf.to_bytes().unwrap();
        assert_eq!(u64::from_le_bytes(bytes[4..12].try_into().unwrap()), 6);
        assert_eq!(u64::from_le_bytes(bytes[12..20].try_into().unwrap()), mphf.num_levels() as u64);
        let level = &mphf.levels()[0];
        assert_eq!(u64::from_le_bytes(bytes[20..28].try_into().unwrap()), level.seed());
        assert_eq!(u64::from_le_bytes(bytes[28..36].try_into().unwrap()), 0);
        assert_eq!(u64::from_le_bytes(bytes[36..44].try_into().unwrap()), level.bit_count() as u64);
    }

    #[test]
    fn test_size_of_any_encodable() {
        assert_eq!(serialized_size(&7u64, STD_BINCODE_CONFIG).unwrap(), 8);
        assert_eq!(serialized_size(&vec![1u64, 2, 3], STD_BINCODE_CONFIG).unwrap(), 32);
    }

    #[test]
    fn test_file_round_trip() {
        let (keys, mphf) = three_level_mphf();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mphf.bin");
        mphf.save(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len() as usize, mphf.serialized_size());

        let loaded = Mphf::load(&path).unwrap();
        assert_eq!(loaded, mphf);
        assert_eq!(loaded.size_in_bits(), mphf.size_in_bits());
        for &k in &keys {
            assert_eq!(loaded.query(k), mphf.query(k));
        }
    }

    #[test]
    fn test_empty_round_trip() {
        let mphf = Mphf::with_gamma(&[], 2.0).unwrap();
        let bytes = mphf.to_bytes().unwrap();
        assert_eq!(bytes.len(), 20);
        let loaded = Mphf::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.num_keys(), 0);
        assert_eq!(loaded.size_in_bits(), 0);
    }

    #[test]
    fn test_bad_magic() {
        let (_keys, mphf) = three_level_mphf();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mphf.bin");
        mphf.save(&path).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes[0..4].copy_from_slice(b"XXXX");
        fs::write(&path, &bytes).unwrap();
        assert!(matches!(Mphf::load(&path), Err(Error::BadMagic)));
        assert!(matches!(Mphf::from_bytes(&bytes), Err(Error::BadMagic)));
    }

    #[test]
    fn test_truncated() {
        let (_keys, mphf) = three_level_mphf();
        let bytes = mphf.to_bytes().unwrap();
        let mut rng = thread_rng();
        let mut cuts : Vec<usize> = vec![0, 3, 4, 11, 20, 27, bytes.len()-1];
        for _ in 0..20 { cuts.push(rng.gen_range(0..bytes.len())); }
        for cut in cuts {
            let short = &bytes[..cut];
            assert!(matches!(Mphf::from_bytes(short), Err(Error::Truncated)), "cut at {}", cut);
            assert!(matches!(Mphf::read_from(&mut &short[..]), Err(Error::Truncated)), "cut at {}", cut);
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mphf = Mphf::with_gamma(&[1, 2, 3], 2.0).unwrap();
        let mut bytes = mphf.to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(Mphf::from_bytes(&bytes), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_corrupt_structure() {
        let mphf = Mphf::with_gamma(&[5, 1, 10, 2, 8, 100], 2.0).unwrap();
        let bytes = mphf.to_bytes().unwrap();

        /* Wrong key count */
        let mut bad = bytes.clone();
        bad[4] ^= 1;
        assert!(matches!(Mphf::from_bytes(&bad), Err(Error::Corrupt(_))));

        /* Nonzero first offset */
        let mut bad = bytes.clone();
        bad[28] = 1;
        assert!(matches!(Mphf::from_bytes(&bad), Err(Error::Corrupt(_))));

        /* Zero-length level */
        let mut bad = bytes.clone();
        bad[36..44].copy_from_slice(&0u64.to_le_bytes());
        assert!(matches!(Mphf::from_bytes(&bad), Err(Error::Corrupt(_))));

        /* Flip a slot bit: placed count and checkpoints no longer agree */
        let mut bad = bytes.clone();
        bad[44] ^= 0x01;
        assert!(matches!(Mphf::from_bytes(&bad), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_huge_bit_count() {
        let mphf = Mphf::with_gamma(&[5, 1, 10, 2, 8, 100], 2.0).unwrap();
        let mut bytes = mphf.to_bytes().unwrap();
        bytes[36..44].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(Mphf::from_bytes(&bytes), Err(Error::Truncated)));
        assert!(matches!(Mphf::read_from(&mut &bytes[..]), Err(Error::Truncated)));

        /* Same length field with nothing after it */
        bytes.truncate(44);
        assert!(matches!(Mphf::from_bytes(&bytes), Err(Error::Truncated)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Mphf::load(dir.path().join("nope.bin")), Err(Error::Io(_))));
    }
}
