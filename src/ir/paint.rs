/// What a shape is filled with.
///
/// Gradient parameters are not carried; only whether the gradient is fully
/// opaque, which is what the rewrite rules need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// Solid color, channels normalized to `[0, 1]`.
    Color {
        /// Alpha.
        a: f64,
        /// Red.
        r: f64,
        /// Green.
        g: f64,
        /// Blue.
        b: f64,
    },
    /// Linear gradient shader.
    LinearGradient {
        /// Every color stop has alpha 1.
        is_opaque: bool,
    },
    /// Radial gradient shader.
    RadialGradient {
        /// Every color stop has alpha 1.
        is_opaque: bool,
    },
}

impl Fill {
    /// Color from 8-bit ARGB channels.
    pub fn from_argb8(a: f64, r: f64, g: f64, b: f64) -> Self {
        Fill::Color {
            a: a / 255.0,
            r: r / 255.0,
            g: g / 255.0,
            b: b / 255.0,
        }
    }

    /// Opaque black.
    pub fn black() -> Self {
        Fill::Color {
            a: 1.0,
            r: 0.0,
            g: 0.0,
            b: 0.0,
        }
    }

    /// `true` when every pixel written by this fill has alpha 1.
    pub fn is_opaque(&self) -> bool {
        match *self {
            Fill::Color { a, .. } => a == 1.0,
            Fill::LinearGradient { is_opaque } | Fill::RadialGradient { is_opaque } => is_opaque,
        }
    }
}

macro_rules! blend_modes {
    ($($variant:ident),+ $(,)?) => {
        /// Porter-Duff and separable/non-separable blend modes, named as Skia names them.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum BlendMode {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl BlendMode {
            /// Every supported mode.
            pub const ALL: &'static [BlendMode] = &[$(BlendMode::$variant),+];

            /// Skia name, as used in traces and in the textual IR.
            pub fn name(self) -> &'static str {
                match self {
                    $(BlendMode::$variant => stringify!($variant),)+
                }
            }

            /// Look up a mode by its Skia name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(BlendMode::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

blend_modes!(
    Clear, Src, Dst, SrcOver, DstOver, SrcIn, DstIn, SrcOut, DstOut, SrcATop, DstATop, Xor, Plus,
    Modulate, Screen, Overlay, Darken, Lighten, ColorDodge, ColorBurn, HardLight, SoftLight,
    Difference, Exclusion, Multiply, Hue, Saturation, Color, Luminosity,
);

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::SrcOver
    }
}

/// Fill the interior or stroke the outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// Fill.
    #[default]
    Solid,
    /// Stroke.
    Stroke,
}

/// Color filter applied after shading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorFilter {
    /// No filter.
    #[default]
    Identity,
    /// Luminance-to-alpha runtime filter.
    Luma,
}

/// How a shape is shaded and composited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Fill source.
    pub fill: Fill,
    /// Compositing operator.
    pub blend_mode: BlendMode,
    /// Fill or stroke.
    pub style: Style,
    /// Color filter.
    pub color_filter: ColorFilter,
    /// Index of the command this paint was compiled from.
    pub provenance: usize,
}

impl Paint {
    /// The paint used when a command carries none: opaque black, `SrcOver`.
    pub fn default_for(provenance: usize) -> Self {
        Self {
            fill: Fill::black(),
            blend_mode: BlendMode::SrcOver,
            style: Style::Solid,
            color_filter: ColorFilter::Identity,
            provenance,
        }
    }

    /// Equality ignoring provenance.
    pub fn same_appearance(&self, other: &Paint) -> bool {
        self.fill == other.fill
            && self.blend_mode == other.blend_mode
            && self.style == other.style
            && self.color_filter == other.color_filter
    }
}
