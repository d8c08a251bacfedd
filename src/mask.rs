use std::collections::HashSet;

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use imageproc::point::Point;
use imageproc::region_labelling::{Connectivity, connected_components};

use crate::models::Contour;

const ON: Luma<u8> = Luma([255]);
const OFF: Luma<u8> = Luma([0]);

/// Same-size boolean grid over an image.
///
/// Every combinator returns a new mask; the only in-place work happens on
/// private copies inside the morphology helpers. Combining masks of
/// different sizes is a caller bug and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// All-false mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// All-true mask
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, ON),
        }
    }

    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        Self {
            image: GrayImage::from_fn(width, height, |x, y| if f(x, y) { ON } else { OFF }),
        }
    }

    /// Any nonzero pixel is treated as set
    pub fn from_gray(gray: &GrayImage) -> Self {
        Self::from_fn(gray.width(), gray.height(), |x, y| gray.get_pixel(x, y)[0] != 0)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] != 0
    }

    /// Number of set pixels
    pub fn count(&self) -> u64 {
        self.image.pixels().filter(|p| p[0] != 0).count() as u64
    }

    /// 0/255 grayscale rendering, handy for debug output
    pub fn to_image(&self) -> GrayImage {
        self.image.clone()
    }

    fn zip_with(&self, other: &Mask, op: impl Fn(bool, bool) -> bool) -> Mask {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "mask dimensions differ"
        );
        Mask::from_fn(self.width(), self.height(), |x, y| {
            op(self.get(x, y), other.get(x, y))
        })
    }

    pub fn union(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a || b)
    }

    pub fn intersect(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a && b)
    }

    pub fn complement(&self) -> Mask {
        Mask::from_fn(self.width(), self.height(), |x, y| !self.get(x, y))
    }

    /// Erode with a square structuring element of side `kernel_size`
    pub fn erode(&self, kernel_size: u32) -> Mask {
        Mask {
            image: morphology::erode(&self.image, Norm::LInf, kernel_radius(kernel_size)),
        }
    }

    /// Dilate with a square structuring element of side `kernel_size`
    pub fn dilate(&self, kernel_size: u32) -> Mask {
        Mask {
            image: morphology::dilate(&self.image, Norm::LInf, kernel_radius(kernel_size)),
        }
    }

    /// Erosion followed by dilation: drops specks smaller than the kernel
    pub fn open(&self, kernel_size: u32) -> Mask {
        self.erode(kernel_size).dilate(kernel_size)
    }

    /// Dilation followed by erosion: closes gaps smaller than the kernel
    pub fn close(&self, kernel_size: u32) -> Mask {
        self.dilate(kernel_size).erode(kernel_size)
    }

    /// Set every unset region that cannot reach the image frame.
    ///
    /// Unset regions are 4-connected, the dual of the 8-connected set regions,
    /// so a diagonal gap in an outline does not leak.
    pub fn fill_holes(&self) -> Mask {
        let unset = self.complement();
        let labels = connected_components(&unset.image, Connectivity::Four, OFF);
        let (width, height) = self.dimensions();

        let mut outside: HashSet<u32> = HashSet::new();
        for (x, y, label) in labels.enumerate_pixels() {
            let on_frame = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_frame && label[0] != 0 {
                outside.insert(label[0]);
            }
        }

        Mask::from_fn(width, height, |x, y| {
            let label = labels.get_pixel(x, y)[0];
            self.get(x, y) || (label != 0 && !outside.contains(&label))
        })
    }

    /// Outer boundaries of every top-level set region; holes are ignored.
    ///
    /// Border following only starts an outer border next to an unset pixel,
    /// so the mask is traced inside a one-pixel unset frame and the points
    /// are shifted back afterwards.
    pub fn external_contours(&self) -> Vec<Contour> {
        let (width, height) = self.dimensions();
        let mut padded = GrayImage::new(width + 2, height + 2);
        image::imageops::replace(&mut padded, &self.image, 1, 1);

        find_contours::<u32>(&padded)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| {
                let points = c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
                Contour::new(points)
            })
            .collect()
    }

    /// The 8-connected region `contour` bounds, with its interior filled
    pub fn filled_region(&self, contour: &Contour) -> Mask {
        let (width, height) = self.dimensions();
        let Some((seed_x, seed_y)) = contour.seed() else {
            return Mask::new(width, height);
        };

        let labels = connected_components(&self.image, Connectivity::Eight, OFF);
        let target = labels.get_pixel(seed_x, seed_y)[0];

        let component = Mask::from_fn(width, height, |x, y| {
            target != 0 && labels.get_pixel(x, y)[0] == target
        });
        component.fill_holes()
    }

    /// The region whose outer boundary encloses the largest area, with its
    /// interior filled. `None` when nothing is set.
    pub fn largest_component(&self) -> Option<LargestComponent> {
        let contours = self.external_contours();
        let candidates = contours.len();
        log::debug!("found {} external contours", candidates);

        let contour = contours.into_iter().fold(None, |best: Option<Contour>, c| match best {
            Some(b) if b.area() >= c.area() => Some(b),
            _ => Some(c),
        })?;

        Some(LargestComponent {
            mask: self.filled_region(&contour),
            contour,
            candidates,
        })
    }

    /// Copy of `img` with every pixel outside the mask set to black
    pub fn apply_to(&self, img: &RgbImage) -> RgbImage {
        assert_eq!(
            self.dimensions(),
            img.dimensions(),
            "mask and image dimensions differ"
        );
        RgbImage::from_fn(img.width(), img.height(), |x, y| {
            if self.get(x, y) {
                *img.get_pixel(x, y)
            } else {
                Rgb([0, 0, 0])
            }
        })
    }
}

/// Winner of `Mask::largest_component`
#[derive(Debug, Clone)]
pub struct LargestComponent {
    pub mask: Mask,
    pub contour: Contour,
    /// How many top-level regions competed
    pub candidates: usize,
}

/// Largest square kernel the morphology helpers support
pub const MAX_KERNEL_SIZE: u32 = 2 * u8::MAX as u32 + 1;

fn kernel_radius(kernel_size: u32) -> u8 {
    debug_assert!(kernel_size <= MAX_KERNEL_SIZE, "kernel too large");
    (kernel_size / 2).min(u8::MAX as u32) as u8
}
