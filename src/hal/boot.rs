//! System Bootloader Handover
//!
//! New images are flashed by the STM32G4 system memory bootloader, which
//! enumerates as a USB DFU device (`dfu-util -a 0 -s 0x08000000:leave`).
//! It expects the chip in its reset state, so the request survives a core
//! reset in a `.uninit` word and the jump happens before any peripheral is
//! configured.

#![allow(unsafe_code)]

use core::mem::MaybeUninit;
use core::ptr::addr_of_mut;

use cortex_m::peripheral::SCB;

/// Vector table of the system memory bootloader
const SYSTEM_MEMORY: u32 = 0x1FFF_0000;

/// Marker left in `BOOT_REQUEST` for the next boot
const BOOT_MAGIC: u32 = 0xB007_DF00;

#[link_section = ".uninit.BIOSPEC_BOOT_REQUEST"]
static mut BOOT_REQUEST: MaybeUninit<u32> = MaybeUninit::uninit();

/// Reset into the system DFU bootloader
pub fn request_system_bootloader() -> ! {
    // SAFETY: single core; the word is only touched here and before the
    // executor starts
    unsafe {
        addr_of_mut!(BOOT_REQUEST)
            .cast::<u32>()
            .write_volatile(BOOT_MAGIC);
    }
    SCB::sys_reset()
}

/// Jump to the system bootloader if the previous run asked for it
///
/// Must be the first thing `main` does. The request is consumed, so a
/// reset out of the bootloader boots the application again.
pub fn enter_requested_bootloader() {
    // SAFETY: see `request_system_bootloader`; any bit pattern is a valid u32
    let requested = unsafe {
        let slot = addr_of_mut!(BOOT_REQUEST).cast::<u32>();
        let requested = slot.read_volatile() == BOOT_MAGIC;
        slot.write_volatile(0);
        requested
    };

    if requested {
        // SAFETY: SYSTEM_MEMORY holds a valid vector table on every STM32G4
        unsafe { cortex_m::asm::bootload(SYSTEM_MEMORY as *const u32) }
    }
}
