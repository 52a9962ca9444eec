//! Masked middle textures (grates, fences, bars) are drawn after
//! everything solid, back to front, clipped by what was in front of them
//! when their wall was stored.

use level::{LineDefFlags, MapData};
use math::{FRACBITS, FRACUNIT, FixedPoint};
use render_trait::{ColumnJob, DrawSink, RenderError, SurfaceKind, TextureProvider};

use crate::defs::{DrawSeg, MASKED_DONE, SpriteClip};
use crate::lighting::wall_light_level;
use crate::segs::SegContext;

impl<T, S> SegContext<'_, T, S>
where
    T: TextureProvider + ?Sized,
    S: DrawSink + ?Sized,
{
    /// R_DrawMasked - r_things, wall part
    pub fn draw_masked(&mut self, map: &MapData) -> Result<(), RenderError> {
        for index in (0..self.r_data.drawsegs.len()).rev() {
            let ds = self.r_data.drawsegs[index];
            if ds.maskedtexturecol.is_some() {
                self.render_masked_seg_range(map, &ds, ds.x1, ds.x2)?;
            }
        }
        Ok(())
    }

    /// Resolve a saved clip array at column `x`. `open` is the value when
    /// nothing was saved, `closed` when the wall hides everything.
    fn sprite_clip(&self, clip: SpriteClip, ds: &DrawSeg, x: i32, open: i32, closed: i32) -> i32 {
        match clip {
            SpriteClip::None => open,
            SpriteClip::Full => closed,
            SpriteClip::Openings(base) => self.r_data.openings[base + (x - ds.x1) as usize],
        }
    }

    /// R_RenderMaskedSegRange - r_segs
    pub fn render_masked_seg_range(
        &mut self,
        map: &MapData,
        ds: &DrawSeg,
        x1: i32,
        x2: i32,
    ) -> Result<(), RenderError> {
        let Some(base) = ds.maskedtexturecol else {
            return Ok(());
        };
        let seg = &map.segments()[ds.seg];
        let Some(back) = seg.backsector.map(|b| &map.sectors()[b]) else {
            return Ok(());
        };
        let front = &map.sectors()[seg.frontsector];
        let side = &map.sidedefs()[seg.sidedef];
        let line = &map.linedefs()[seg.linedef];
        let Some(midtexture) = side.midtexture else {
            return Ok(());
        };

        let view = self.view;
        let proj = self.proj;
        let height = proj.size.height();
        let texnum = self.textures.translate_texture(midtexture);
        let texheight = self.textures.texture_height(texnum);
        let level = wall_light_level(front.lightlevel, view.extralight, &seg.v1, &seg.v2);

        // find positioning
        let mut texturemid = if LineDefFlags::UnpegBottom.is_set(line.flags) {
            front.floorheight.max(back.floorheight) + texheight - view.z
        } else {
            front.ceilingheight.min(back.ceilingheight) - view.z
        };
        texturemid += side.rowoffset;

        let mut spryscale = ds.scale_at(x1);
        for x in x1..=x2 {
            let slot = base + (x - ds.x1) as usize;
            let texturecolumn = self.r_data.openings[slot];
            // calculate lighting
            if texturecolumn != MASKED_DONE {
                let light = view
                    .fixed_colormap
                    .unwrap_or_else(|| self.lights.scale_light(level, spryscale));
                let top = self.sprite_clip(ds.sprtopclip, ds, x, -1, height);
                let bottom = self.sprite_clip(ds.sprbottomclip, ds, x, height, -1);

                let sprtopscreen = proj.centeryfrac - texturemid * spryscale;
                let sprbottomscreen = sprtopscreen + texheight * spryscale;
                let yl = (sprtopscreen.raw().wrapping_add(FRACUNIT - 1) >> FRACBITS).max(top + 1);
                let yh = (sprbottomscreen.raw().wrapping_sub(1) >> FRACBITS).min(bottom - 1);

                if yl <= yh {
                    self.sink.draw_column(ColumnJob {
                        x,
                        yl,
                        yh,
                        kind: SurfaceKind::Masked,
                        source: self.textures.wall_column(texnum, texturecolumn),
                        texture_mid: texturemid,
                        iscale: FixedPoint::new(
                            (0xffff_ffff_u32 / spryscale.raw().max(1) as u32) as i32,
                        ),
                        scale: spryscale,
                        light,
                    })?;
                }
                self.r_data.openings[slot] = MASKED_DONE;
            }
            spryscale += ds.scalestep;
        }
        Ok(())
    }
}
