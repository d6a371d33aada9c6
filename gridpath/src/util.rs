use image::{DynamicImage, GenericImageView};

use crate::{CellState, Grid, Position};

/// Build a grid from a thresholded image: dark pixels become barriers, everything else is empty
pub fn grid_from_image(img: &DynamicImage) -> Result<Grid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut grid = Grid::new(height, width)?;

    for row in 0..height {
        for col in 0..width {
            let p = img.get_pixel(col as u32, row as u32);

            if p.0[0] < 128 {
                grid.set_cell(
                    Position::new(row as isize, col as isize),
                    CellState::Barrier,
                )?;
            }
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod test {

    use image::{GrayImage, Luma};

    use super::*;

    #[test]
    fn test_threshold() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([255]));
        img.put_pixel(1, 0, Luma([0]));
        img.put_pixel(2, 1, Luma([127]));
        img.put_pixel(0, 1, Luma([128]));

        let grid = grid_from_image(&DynamicImage::ImageLuma8(img)).unwrap();

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.to_string(), " X \n  X\n");
    }

    #[test]
    fn test_empty_image() {
        let img = DynamicImage::new_luma8(0, 0);
        assert!(grid_from_image(&img).is_err());
    }
}
