// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Pixel values and the full-range BT.601 (JFIF) RGB <-> YCbCr conversion.

/// Offset of the chroma channels in 8-bit YCbCr.
pub const CHROMA_OFFSET: f64 = 128.0;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ColorSpace {
    Rgb,
    YCbCr,
}

#[inline]
fn rgb_to_ycbcr([r, g, b]: [f64; 3]) -> [f64; 3] {
    [
        0.299 * r + 0.587 * g + 0.114 * b,
        -0.168736 * r - 0.331264 * g + 0.5 * b + CHROMA_OFFSET,
        0.5 * r - 0.418688 * g - 0.081312 * b + CHROMA_OFFSET,
    ]
}

#[inline]
fn ycbcr_to_rgb([y, cb, cr]: [f64; 3]) -> [f64; 3] {
    let cb = cb - CHROMA_OFFSET;
    let cr = cr - CHROMA_OFFSET;
    [
        cr.mul_add(1.402, y),
        cr.mul_add(-0.714136, cb.mul_add(-0.344136, y)),
        cb.mul_add(1.772, y),
    ]
}

/// Three channel values tagged with the color space they are expressed in.
///
/// Values are not clamped: decoded pixels may fall slightly outside of
/// `[0, 255]` until they are written out.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Pixel {
    channels: [f64; 3],
    space: ColorSpace,
}

impl Pixel {
    pub fn rgb(r: f64, g: f64, b: f64) -> Pixel {
        Pixel {
            channels: [r, g, b],
            space: ColorSpace::Rgb,
        }
    }

    pub fn ycbcr(y: f64, cb: f64, cr: f64) -> Pixel {
        Pixel {
            channels: [y, cb, cr],
            space: ColorSpace::YCbCr,
        }
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Channel values in the pixel's own color space.
    pub fn channels(&self) -> [f64; 3] {
        self.channels
    }

    pub fn to_rgb_array(&self) -> [f64; 3] {
        match self.space {
            ColorSpace::Rgb => self.channels,
            ColorSpace::YCbCr => ycbcr_to_rgb(self.channels),
        }
    }

    pub fn to_ycbcr_array(&self) -> [f64; 3] {
        match self.space {
            ColorSpace::Rgb => rgb_to_ycbcr(self.channels),
            ColorSpace::YCbCr => self.channels,
        }
    }

    pub fn to_rgb(&self) -> Pixel {
        let [r, g, b] = self.to_rgb_array();
        Pixel::rgb(r, g, b)
    }

    pub fn to_ycbcr(&self) -> Pixel {
        let [y, cb, cr] = self.to_ycbcr_array();
        Pixel::ycbcr(y, cb, cr)
    }

    pub fn r(&self) -> f64 {
        self.to_rgb_array()[0]
    }

    pub fn g(&self) -> f64 {
        self.to_rgb_array()[1]
    }

    pub fn b(&self) -> f64 {
        self.to_rgb_array()[2]
    }

    pub fn y(&self) -> f64 {
        self.to_ycbcr_array()[0]
    }

    pub fn cb(&self) -> f64 {
        self.to_ycbcr_array()[1]
    }

    pub fn cr(&self) -> f64 {
        self.to_ycbcr_array()[2]
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Pixel::rgb(0.0, 0.0, 0.0)
    }
}
