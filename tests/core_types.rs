use stereomatch::lowlevel::BlockWindow;
use stereomatch::{
    BlockMatchConfig, BlockMatcher, DisparityRange, ImageView, OwnedImage, StereoError, StereoPair,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        StereoError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        StereoError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        StereoError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, StereoError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.shape(), (2, 2));
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert!(roi.get(2, 0).is_none());

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        StereoError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn owned_image_copies_strided_view() {
    let padded: Vec<u8> = vec![1, 2, 0, 3, 4, 0];
    let view = ImageView::new(&padded, 2, 2, 3).unwrap();
    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.data(), &[1u8, 2, 3, 4]);
    assert_eq!(owned.view().stride(), 2);
}

#[test]
fn corner_window_is_smaller_than_interior_window() {
    let (width, height) = (10, 10);
    let corner = BlockWindow::around(width, height, 0, 0, 2);
    let interior = BlockWindow::around(width, height, 5, 5, 2);

    assert_eq!((corner.width(), corner.height()), (2, 2));
    assert_eq!((interior.width(), interior.height()), (4, 4));
    assert!(corner.width() < interior.width());
    assert!(corner.height() < interior.height());
}

#[test]
fn stereo_pair_rejects_shape_mismatch() {
    let left = [0u8; 12];
    let right = [0u8; 12];
    let left = ImageView::from_slice(&left, 4, 3).unwrap();
    let right = ImageView::from_slice(&right, 3, 4).unwrap();

    let err = StereoPair::new(left, right).err().unwrap();
    assert_eq!(
        err,
        StereoError::ShapeMismatch {
            left_width: 4,
            left_height: 3,
            right_width: 3,
            right_height: 4,
        }
    );
}

#[test]
fn disparity_range_requires_ordering() {
    assert!(DisparityRange::new(3, 3).is_ok());
    let err = DisparityRange::new(5, 2).err().unwrap();
    assert_eq!(err, StereoError::InvalidDisparityRange { min: 5, max: 2 });
}

#[test]
fn block_matcher_validates_config() {
    let cfg = BlockMatchConfig {
        disparity: DisparityRange { min: 8, max: 4 },
        ..BlockMatchConfig::default()
    };
    let err = BlockMatcher::new(cfg).err().unwrap();
    assert_eq!(err, StereoError::InvalidDisparityRange { min: 8, max: 4 });
}
