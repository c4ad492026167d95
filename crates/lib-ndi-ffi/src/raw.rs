//! Native create-settings records.
//!
//! Owned settings from `lib_ndi_types::settings` are lowered into these
//! `#[repr(C)]` records only for the duration of one create call. The
//! strings they point at live in a [`CStringArena`] owned by the caller.

use crate::error::NdiResult;
use crate::strings::{string_from_transient, CStringArena};
use lib_ndi_types::{
    FindCreateSettings, RecvCreateSettings, RoutingCreateSettings, SendCreateSettings, Source,
};
use std::ffi::c_char;

/// `NDIlib_source_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SourceRaw {
    pub p_ndi_name: *const c_char,
    /// Union with `p_ip_address` in older headers; same address either way.
    pub p_url_address: *const c_char,
}

impl SourceRaw {
    pub fn lower(source: &Source, arena: &mut CStringArena) -> NdiResult<Self> {
        // An empty name is passed as null so the receiver stays idle.
        let name = (!source.name.is_empty()).then_some(source.name.as_str());
        Ok(Self {
            p_ndi_name: arena.push_opt("source.name", name)?,
            p_url_address: arena.push_opt("source.url_address", source.url_address.as_deref())?,
        })
    }

    /// Copy both strings out.
    ///
    /// # Safety
    ///
    /// Both pointers must be null or valid NUL-terminated strings.
    pub unsafe fn to_source(&self) -> NdiResult<Source> {
        let name = unsafe { string_from_transient(self.p_ndi_name)? }.unwrap_or_default();
        let url_address = unsafe { string_from_transient(self.p_url_address)? };
        Ok(Source { name, url_address })
    }
}

/// `NDIlib_find_create_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct FindCreateRaw {
    pub show_local_sources: bool,
    pub p_groups: *const c_char,
    pub p_extra_ips: *const c_char,
}

impl FindCreateRaw {
    pub fn lower(settings: &FindCreateSettings, arena: &mut CStringArena) -> NdiResult<Self> {
        Ok(Self {
            show_local_sources: settings.show_local_sources,
            p_groups: arena.push_opt("groups", settings.groups.as_deref())?,
            p_extra_ips: arena.push_opt("extra_ips", settings.extra_ips.as_deref())?,
        })
    }
}

/// `NDIlib_send_create_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SendCreateRaw {
    pub p_ndi_name: *const c_char,
    pub p_groups: *const c_char,
    pub clock_video: bool,
    pub clock_audio: bool,
}

impl SendCreateRaw {
    pub fn lower(settings: &SendCreateSettings, arena: &mut CStringArena) -> NdiResult<Self> {
        Ok(Self {
            p_ndi_name: arena.push("name", &settings.name)?,
            p_groups: arena.push_opt("groups", settings.groups.as_deref())?,
            clock_video: settings.clock_video,
            clock_audio: settings.clock_audio,
        })
    }
}

/// `NDIlib_recv_create_v3_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RecvCreateV3Raw {
    pub source_to_connect_to: SourceRaw,
    pub color_format: i32,
    pub bandwidth: i32,
    pub allow_video_fields: bool,
    pub p_ndi_recv_name: *const c_char,
}

impl RecvCreateV3Raw {
    pub fn lower(settings: &RecvCreateSettings, arena: &mut CStringArena) -> NdiResult<Self> {
        Ok(Self {
            source_to_connect_to: SourceRaw::lower(&settings.source, arena)?,
            color_format: settings.color_format.raw(),
            bandwidth: settings.bandwidth.raw(),
            allow_video_fields: settings.allow_video_fields,
            p_ndi_recv_name: arena.push_opt("name", settings.name.as_deref())?,
        })
    }
}

/// `NDIlib_routing_create_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RoutingCreateRaw {
    pub p_ndi_name: *const c_char,
    pub p_groups: *const c_char,
}

impl RoutingCreateRaw {
    pub fn lower(settings: &RoutingCreateSettings, arena: &mut CStringArena) -> NdiResult<Self> {
        Ok(Self {
            p_ndi_name: arena.push("name", &settings.name)?,
            p_groups: arena.push_opt("groups", settings.groups.as_deref())?,
        })
    }
}
