//! Minimal ELF32 little-endian image writers
//!
//! Produces just enough ELF for the readers in this crate: a core dump with
//! one `PT_LOAD` program header per memory region, and a symbol file with a
//! `.symtab`/`.strtab` pair. Used by the test suites and the `make-fixture`
//! example.

use crate::ring_buffer::RingBufferControl;

const ELFMAG: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const ELFCLASS32: u8 = 1;
const ELFDATA2LSB: u8 = 1;
const EV_CURRENT: u8 = 1;
const ET_EXEC: u16 = 2;
const ET_CORE: u16 = 4;
const EM_ARM: u16 = 40;
const PT_LOAD: u32 = 1;
const PF_R: u32 = 4;
const PF_W: u32 = 2;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;
const SHN_ABS: u16 = 0xfff1;
const STB_GLOBAL_STT_OBJECT: u8 = 0x11;

const EHDR_SIZE: u16 = 52;
const PHDR_SIZE: u16 = 32;
const SHDR_SIZE: u16 = 40;
const SYM_SIZE: u32 = 16;

struct Header {
    e_type: u16,
    phoff: u32,
    phnum: u16,
    shoff: u32,
    shnum: u16,
    shstrndx: u16,
}

fn write_header(out: &mut Vec<u8>, h: &Header) {
    out.extend_from_slice(&ELFMAG);
    out.extend_from_slice(&[ELFCLASS32, ELFDATA2LSB, EV_CURRENT]);
    out.extend_from_slice(&[0; 9]); // EI_OSABI through EI_PAD
    out.extend_from_slice(&h.e_type.to_le_bytes());
    out.extend_from_slice(&EM_ARM.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes()); // e_version
    out.extend_from_slice(&0u32.to_le_bytes()); // e_entry
    out.extend_from_slice(&h.phoff.to_le_bytes());
    out.extend_from_slice(&h.shoff.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&EHDR_SIZE.to_le_bytes());
    out.extend_from_slice(&PHDR_SIZE.to_le_bytes());
    out.extend_from_slice(&h.phnum.to_le_bytes());
    out.extend_from_slice(&SHDR_SIZE.to_le_bytes());
    out.extend_from_slice(&h.shnum.to_le_bytes());
    out.extend_from_slice(&h.shstrndx.to_le_bytes());
}

fn pad4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

fn len32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Build an `ET_CORE` image with one loadable segment per `(vaddr, bytes)`
#[must_use]
pub fn core_dump(regions: &[(u32, &[u8])]) -> Vec<u8> {
    let phnum = u16::try_from(regions.len()).unwrap_or(u16::MAX);
    let phoff = if regions.is_empty() { 0 } else { u32::from(EHDR_SIZE) };

    let mut out = Vec::new();
    write_header(
        &mut out,
        &Header { e_type: ET_CORE, phoff, phnum, shoff: 0, shnum: 0, shstrndx: 0 },
    );

    let mut data_offset = u32::from(EHDR_SIZE) + u32::from(phnum) * u32::from(PHDR_SIZE);
    for (vaddr, bytes) in regions {
        let size = len32(bytes.len());
        out.extend_from_slice(&PT_LOAD.to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());
        out.extend_from_slice(&vaddr.to_le_bytes()); // p_vaddr
        out.extend_from_slice(&vaddr.to_le_bytes()); // p_paddr
        out.extend_from_slice(&size.to_le_bytes()); // p_filesz
        out.extend_from_slice(&size.to_le_bytes()); // p_memsz
        out.extend_from_slice(&(PF_R | PF_W).to_le_bytes());
        out.extend_from_slice(&4u32.to_le_bytes()); // p_align
        data_offset += size.next_multiple_of(4);
    }

    for (_, bytes) in regions {
        out.extend_from_slice(bytes);
        pad4(&mut out);
    }

    out
}

/// Build an `ET_EXEC` image whose `.symtab` holds the given absolute symbols
#[must_use]
pub fn symbol_file(symbols: &[(&str, u32)]) -> Vec<u8> {
    let mut strtab = vec![0u8];
    let mut name_offsets = Vec::with_capacity(symbols.len());
    for (name, _) in symbols {
        name_offsets.push(len32(strtab.len()));
        strtab.extend_from_slice(name.as_bytes());
        strtab.push(0);
    }
    let shstrtab = b"\0.symtab\0.strtab\0.shstrtab\0";

    let symtab_offset = u32::from(EHDR_SIZE);
    let symtab_size = (len32(symbols.len()) + 1) * SYM_SIZE;
    let strtab_offset = symtab_offset + symtab_size;
    let shstrtab_offset = strtab_offset + len32(strtab.len());
    let shoff = (shstrtab_offset + len32(shstrtab.len())).next_multiple_of(4);

    let mut out = Vec::new();
    write_header(
        &mut out,
        &Header { e_type: ET_EXEC, phoff: 0, phnum: 0, shoff, shnum: 4, shstrndx: 3 },
    );

    // Null symbol, then one global absolute data symbol per entry
    out.extend_from_slice(&[0; SYM_SIZE as usize]);
    for ((_, value), name) in symbols.iter().zip(&name_offsets) {
        out.extend_from_slice(&name.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
        out.extend_from_slice(&4u32.to_le_bytes()); // st_size
        out.push(STB_GLOBAL_STT_OBJECT);
        out.push(0); // st_other
        out.extend_from_slice(&SHN_ABS.to_le_bytes());
    }
    out.extend_from_slice(&strtab);
    out.extend_from_slice(shstrtab);
    pad4(&mut out);

    let mut section = |name: u32, sh_type: u32, offset: u32, size: u32, link: u32, info: u32, entsize: u32| {
        for field in [name, sh_type, 0, 0, offset, size, link, info, 1, entsize] {
            out.extend_from_slice(&field.to_le_bytes());
        }
    };
    section(0, 0, 0, 0, 0, 0, 0);
    section(1, SHT_SYMTAB, symtab_offset, symtab_size, 2, 1, SYM_SIZE);
    section(9, SHT_STRTAB, strtab_offset, len32(strtab.len()), 0, 0, 0);
    section(17, SHT_STRTAB, shstrtab_offset, len32(shstrtab.len()), 0, 0, 0);

    out
}

/// Core dump holding a ring buffer control structure at `control_addr` and
/// its backing array at `control.buffer`
#[must_use]
pub fn ring_buffer_core(control_addr: u32, control: &RingBufferControl, array: &[u8]) -> Vec<u8> {
    core_dump(&[(control_addr, &control.encode()[..]), (control.buffer, array)])
}
